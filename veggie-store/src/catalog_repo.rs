use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use uuid::Uuid;
use veggie_core::{CatalogRepository, CoreError, CoreResult};
use veggie_shared::models::{Vegetable, VegetableUnit};
use veggie_shared::LocalizedNames;

use crate::error::{StoreError, StoreResult};
use crate::session::SqliteSession;

#[derive(sqlx::FromRow)]
struct VegetableRow {
    id: Uuid,
    name_en: String,
    name_hi: String,
    name_te: String,
    unit_prices: String,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VegetableRow> for Vegetable {
    type Error = StoreError;

    fn try_from(row: VegetableRow) -> StoreResult<Self> {
        let unit_prices: BTreeMap<String, Decimal> = serde_json::from_str(&row.unit_prices)?;
        Ok(Vegetable {
            id: row.id,
            names: LocalizedNames::new(row.name_en, row.name_hi, row.name_te),
            unit_prices,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UnitRow {
    id: Uuid,
    code: String,
    name_en: String,
    name_hi: String,
    name_te: String,
}

impl From<UnitRow> for VegetableUnit {
    fn from(row: UnitRow) -> Self {
        VegetableUnit {
            id: row.id,
            code: row.code,
            names: LocalizedNames::new(row.name_en, row.name_hi, row.name_te),
        }
    }
}

const VEGETABLE_COLUMNS: &str = "id, name_en, name_hi, name_te, unit_prices, updated_at";

#[async_trait]
impl CatalogRepository for SqliteSession {
    async fn vegetable(&mut self, id: Uuid) -> CoreResult<Option<Vegetable>> {
        let row = sqlx::query_as::<_, VegetableRow>(&format!(
            "SELECT {} FROM vegetables WHERE id = ?",
            VEGETABLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(row.map(Vegetable::try_from).transpose()?)
    }

    async fn list_vegetables(&mut self) -> CoreResult<Vec<Vegetable>> {
        let rows = sqlx::query_as::<_, VegetableRow>(&format!(
            "SELECT {} FROM vegetables ORDER BY name_en",
            VEGETABLE_COLUMNS
        ))
        .fetch_all(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        let vegetables = rows
            .into_iter()
            .map(Vegetable::try_from)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(vegetables)
    }

    async fn save_vegetable(&mut self, vegetable: &Vegetable) -> CoreResult<()> {
        let unit_prices = serde_json::to_string(&vegetable.unit_prices).map_err(StoreError::from)?;

        sqlx::query(
            r#"
            INSERT INTO vegetables (id, name_en, name_hi, name_te, unit_prices, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name_en = excluded.name_en,
                name_hi = excluded.name_hi,
                name_te = excluded.name_te,
                unit_prices = excluded.unit_prices,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(vegetable.id)
        .bind(&vegetable.names.en)
        .bind(&vegetable.names.hi)
        .bind(&vegetable.names.te)
        .bind(unit_prices)
        .bind(vegetable.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(())
    }

    async fn delete_vegetable(&mut self, id: Uuid) -> CoreResult<()> {
        let result = sqlx::query("DELETE FROM vegetables WHERE id = ?")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::from)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Vegetable", id));
        }
        Ok(())
    }

    async fn list_units(&mut self) -> CoreResult<Vec<VegetableUnit>> {
        let rows = sqlx::query_as::<_, UnitRow>(
            "SELECT id, code, name_en, name_hi, name_te FROM vegetable_units ORDER BY code",
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(rows.into_iter().map(VegetableUnit::from).collect())
    }

    async fn save_unit(&mut self, unit: &VegetableUnit) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO vegetable_units (id, code, name_en, name_hi, name_te)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                code = excluded.code,
                name_en = excluded.name_en,
                name_hi = excluded.name_hi,
                name_te = excluded.name_te
            "#,
        )
        .bind(unit.id)
        .bind(&unit.code)
        .bind(&unit.names.en)
        .bind(&unit.names.hi)
        .bind(&unit.names.te)
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(())
    }
}
