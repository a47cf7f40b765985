use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use veggie_core::{CoreResult, CustomerRepository};
use veggie_shared::models::{Customer, CustomerPricing};

use crate::error::{StoreError, StoreResult};
use crate::session::{decimal, enum_value, SqliteSession};

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    name: String,
    phone_number: Option<String>,
    email: Option<String>,
    address: Option<String>,
    customer_type: String,
    credit_limit: String,
    current_credit: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = StoreError;

    fn try_from(row: CustomerRow) -> StoreResult<Self> {
        Ok(Customer {
            id: row.id,
            name: row.name,
            phone_number: row.phone_number,
            email: row.email,
            address: row.address,
            customer_type: enum_value("customers.customer_type", &row.customer_type)?,
            credit_limit: decimal("customers.credit_limit", &row.credit_limit)?,
            current_credit: decimal("customers.current_credit", &row.current_credit)?,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PricingRow {
    id: Uuid,
    customer_id: Uuid,
    vegetable_id: Uuid,
    special_price: String,
    unit: String,
    valid_from: DateTime<Utc>,
    valid_to: Option<DateTime<Utc>>,
    minimum_quantity: String,
    discount_percentage: String,
}

impl TryFrom<PricingRow> for CustomerPricing {
    type Error = StoreError;

    fn try_from(row: PricingRow) -> StoreResult<Self> {
        Ok(CustomerPricing {
            id: row.id,
            customer_id: row.customer_id,
            vegetable_id: row.vegetable_id,
            special_price: decimal("customer_pricing.special_price", &row.special_price)?,
            unit: row.unit,
            valid_from: row.valid_from,
            valid_to: row.valid_to,
            minimum_quantity: decimal("customer_pricing.minimum_quantity", &row.minimum_quantity)?,
            discount_percentage: decimal(
                "customer_pricing.discount_percentage",
                &row.discount_percentage,
            )?,
        })
    }
}

const CUSTOMER_COLUMNS: &str = "id, name, phone_number, email, address, customer_type, \
     credit_limit, current_credit, is_active, created_at, updated_at";

#[async_trait]
impl CustomerRepository for SqliteSession {
    async fn customer(&mut self, id: Uuid) -> CoreResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE id = ?",
            CUSTOMER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(row.map(Customer::try_from).transpose()?)
    }

    async fn list_customers(&mut self) -> CoreResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers ORDER BY name",
            CUSTOMER_COLUMNS
        ))
        .fetch_all(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        let customers = rows
            .into_iter()
            .map(Customer::try_from)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(customers)
    }

    async fn save_customer(&mut self, customer: &Customer) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone_number, email, address, customer_type,
                                   credit_limit, current_credit, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                phone_number = excluded.phone_number,
                email = excluded.email,
                address = excluded.address,
                customer_type = excluded.customer_type,
                credit_limit = excluded.credit_limit,
                current_credit = excluded.current_credit,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(customer.id)
        .bind(&customer.name)
        .bind(&customer.phone_number)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(customer.customer_type.to_string())
        .bind(customer.credit_limit.to_string())
        .bind(customer.current_credit.to_string())
        .bind(customer.is_active)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(())
    }

    async fn pricing_rows(
        &mut self,
        customer_id: Uuid,
        vegetable_id: Uuid,
    ) -> CoreResult<Vec<CustomerPricing>> {
        let rows = sqlx::query_as::<_, PricingRow>(
            r#"
            SELECT id, customer_id, vegetable_id, special_price, unit, valid_from, valid_to,
                   minimum_quantity, discount_percentage
            FROM customer_pricing
            WHERE customer_id = ? AND vegetable_id = ?
            "#,
        )
        .bind(customer_id)
        .bind(vegetable_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        let pricing = rows
            .into_iter()
            .map(CustomerPricing::try_from)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(pricing)
    }

    async fn save_pricing(&mut self, pricing: &CustomerPricing) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO customer_pricing (id, customer_id, vegetable_id, special_price, unit,
                                          valid_from, valid_to, minimum_quantity, discount_percentage)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                special_price = excluded.special_price,
                unit = excluded.unit,
                valid_from = excluded.valid_from,
                valid_to = excluded.valid_to,
                minimum_quantity = excluded.minimum_quantity,
                discount_percentage = excluded.discount_percentage
            "#,
        )
        .bind(pricing.id)
        .bind(pricing.customer_id)
        .bind(pricing.vegetable_id)
        .bind(pricing.special_price.to_string())
        .bind(&pricing.unit)
        .bind(pricing.valid_from)
        .bind(pricing.valid_to)
        .bind(pricing.minimum_quantity.to_string())
        .bind(pricing.discount_percentage.to_string())
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(())
    }
}
