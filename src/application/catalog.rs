use sqlx::sqlite::SqliteConnection;
use tracing::info;

use crate::domain::{
    Material, MaterialId, MaterialInput, MaterialType, MaterialTypeId, MaterialTypeInput, Vendor,
    VendorId, VendorInput,
};
use crate::storage::catalog;

use super::{AppError, ShopService};

impl ShopService {
    // ========================
    // Material types
    // ========================

    pub async fn create_material_type(&self, input: MaterialTypeInput) -> Result<MaterialType, AppError> {
        input.validate()?;

        let mut write = self.begin_write().await?;
        if catalog::type_id_by_name(&mut write.tx, &input.name).await?.is_some() {
            return Err(AppError::conflict("MaterialType", input.name.trim()));
        }
        let material_type = catalog::insert_type(&mut write.tx, &input).await?;
        write.commit().await?;

        info!(type_id = material_type.type_id, name = %material_type.name, "created material type");
        Ok(material_type)
    }

    pub async fn list_material_types(&self) -> Result<Vec<MaterialType>, AppError> {
        let mut conn = self.repo.acquire().await?;
        Ok(catalog::list_types(&mut conn).await?)
    }

    pub async fn get_material_type(&self, id: MaterialTypeId) -> Result<MaterialType, AppError> {
        let mut conn = self.repo.acquire().await?;
        catalog::get_type(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found("MaterialType", id))
    }

    pub async fn rename_material_type(
        &self,
        id: MaterialTypeId,
        input: MaterialTypeInput,
    ) -> Result<MaterialType, AppError> {
        input.validate()?;

        let mut write = self.begin_write().await?;
        if !catalog::type_exists(&mut write.tx, id).await? {
            return Err(AppError::not_found("MaterialType", id));
        }
        match catalog::type_id_by_name(&mut write.tx, &input.name).await? {
            Some(holder) if holder != id => {
                return Err(AppError::conflict("MaterialType", input.name.trim()));
            }
            _ => {}
        }
        catalog::rename_type(&mut write.tx, id, &input).await?;
        write.commit().await?;

        info!(type_id = id, name = %input.name.trim(), "renamed material type");
        Ok(MaterialType {
            type_id: id,
            name: input.name.trim().to_string(),
        })
    }

    /// Delete a material type. Refused while catalog materials use it.
    pub async fn delete_material_type(&self, id: MaterialTypeId) -> Result<(), AppError> {
        let mut write = self.begin_write().await?;
        if !catalog::type_exists(&mut write.tx, id).await? {
            return Err(AppError::not_found("MaterialType", id));
        }
        let in_use = catalog::count_for_type(&mut write.tx, id).await?;
        if in_use > 0 {
            return Err(AppError::InvalidState(format!(
                "Material type {id} is used by {in_use} material(s)"
            )));
        }
        catalog::delete_type(&mut write.tx, id).await?;
        write.commit().await?;

        info!(type_id = id, "deleted material type");
        Ok(())
    }

    // ========================
    // Vendors
    // ========================

    pub async fn create_vendor(&self, input: VendorInput) -> Result<Vendor, AppError> {
        input.validate()?;

        let mut write = self.begin_write().await?;
        let vendor = catalog::insert_vendor(&mut write.tx, &input).await?;
        write.commit().await?;

        info!(vendor_id = vendor.vendor_id, name = %vendor.name, "created vendor");
        Ok(vendor)
    }

    pub async fn list_vendors(&self) -> Result<Vec<Vendor>, AppError> {
        let mut conn = self.repo.acquire().await?;
        Ok(catalog::list_vendors(&mut conn).await?)
    }

    pub async fn get_vendor(&self, id: VendorId) -> Result<Vendor, AppError> {
        let mut conn = self.repo.acquire().await?;
        catalog::get_vendor(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found("Vendor", id))
    }

    pub async fn update_vendor(&self, id: VendorId, input: VendorInput) -> Result<Vendor, AppError> {
        input.validate()?;

        let mut write = self.begin_write().await?;
        if !catalog::update_vendor(&mut write.tx, id, &input).await? {
            return Err(AppError::not_found("Vendor", id));
        }
        let vendor = catalog::get_vendor(&mut write.tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Vendor", id))?;
        write.commit().await?;

        info!(vendor_id = id, "updated vendor");
        Ok(vendor)
    }

    /// Delete a vendor. Materials bought from it keep their rows with the
    /// vendor cleared.
    pub async fn delete_vendor(&self, id: VendorId) -> Result<(), AppError> {
        let mut write = self.begin_write().await?;
        if !catalog::vendor_exists(&mut write.tx, id).await? {
            return Err(AppError::not_found("Vendor", id));
        }
        let detached = catalog::clear_vendor(&mut write.tx, id).await?;
        catalog::delete_vendor(&mut write.tx, id).await?;
        write.commit().await?;

        info!(vendor_id = id, detached, "deleted vendor");
        Ok(())
    }

    // ========================
    // Materials
    // ========================

    pub async fn create_material(&self, input: MaterialInput) -> Result<Material, AppError> {
        input.validate()?;

        let mut write = self.begin_write().await?;
        check_material_references(&mut write.tx, &input).await?;
        let material = catalog::insert_material(&mut write.tx, &input).await?;
        write.commit().await?;

        info!(material_id = material.material_id, type_id = material.type_id, "created material");
        Ok(material)
    }

    pub async fn list_materials(&self) -> Result<Vec<Material>, AppError> {
        let mut conn = self.repo.acquire().await?;
        Ok(catalog::list_materials(&mut conn).await?)
    }

    pub async fn get_material(&self, id: MaterialId) -> Result<Material, AppError> {
        let mut conn = self.repo.acquire().await?;
        catalog::get_material(&mut conn, id)
            .await?
            .ok_or_else(|| AppError::not_found("Material", id))
    }

    pub async fn update_material(&self, id: MaterialId, input: MaterialInput) -> Result<Material, AppError> {
        input.validate()?;

        let mut write = self.begin_write().await?;
        if catalog::get_material(&mut write.tx, id).await?.is_none() {
            return Err(AppError::not_found("Material", id));
        }
        check_material_references(&mut write.tx, &input).await?;
        catalog::update_material(&mut write.tx, id, &input).await?;
        let material = catalog::get_material(&mut write.tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Material", id))?;
        write.commit().await?;

        info!(material_id = id, "updated material");
        Ok(material)
    }

    pub async fn delete_material(&self, id: MaterialId) -> Result<(), AppError> {
        let mut write = self.begin_write().await?;
        if !catalog::delete_material(&mut write.tx, id).await? {
            return Err(AppError::not_found("Material", id));
        }
        write.commit().await?;

        info!(material_id = id, "deleted material");
        Ok(())
    }
}

async fn check_material_references(conn: &mut SqliteConnection, input: &MaterialInput) -> Result<(), AppError> {
    if !catalog::type_exists(conn, input.type_id).await? {
        return Err(AppError::invalid_reference("MaterialType", input.type_id));
    }
    if let Some(vendor_id) = input.vendor_id {
        if !catalog::vendor_exists(conn, vendor_id).await? {
            return Err(AppError::invalid_reference("Vendor", vendor_id));
        }
    }
    Ok(())
}
