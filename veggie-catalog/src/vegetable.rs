use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use veggie_core::{CatalogRepository, CoreError, CoreResult, Store, StoreSession};
use veggie_shared::models::{Vegetable, VegetableUnit};
use veggie_shared::LocalizedNames;

/// Default catalog price of `vegetable` when sold by `unit`
pub fn catalog_price(vegetable: &Vegetable, unit: &str) -> CoreResult<Decimal> {
    vegetable.price_for(unit).ok_or_else(|| {
        CoreError::not_found("Vegetable price", format!("{} per {}", vegetable.names.en, unit))
    })
}

/// Selling units every fresh store starts with
pub fn default_units() -> Vec<VegetableUnit> {
    vec![
        VegetableUnit::new("kg", LocalizedNames::new("Kilogram", "किलोग्राम", "కిలోగ్రాము")),
        VegetableUnit::new("bunch_small", LocalizedNames::new("Small Bunch", "छोटा गट्ठा", "చిన్న కట్ట")),
        VegetableUnit::new("bunch_big", LocalizedNames::new("Big Bunch", "बड़ा गट्ठा", "పెద్ద కట్ట")),
        VegetableUnit::new("box", LocalizedNames::new("Box", "बॉक्स", "పెట్టె")),
        VegetableUnit::new("basket", LocalizedNames::new("Basket", "टोकरी", "బుట్ట")),
        VegetableUnit::new("piece", LocalizedNames::new("Piece", "नग", "ఒక్కటి")),
        VegetableUnit::new("dozen", LocalizedNames::new("Dozen", "दर्जन", "డజను")),
    ]
}

/// Starter catalog with default prices
pub fn default_vegetables() -> Vec<Vegetable> {
    vec![
        Vegetable::new(LocalizedNames::new("Tomato", "टमाटर", "టమాటో"))
            .with_price("kg", dec!(40.0))
            .with_price("box", dec!(400.0)),
        Vegetable::new(LocalizedNames::new("Onion", "प्याज", "ఉల్లిపాయ"))
            .with_price("kg", dec!(30.0))
            .with_price("box", dec!(300.0)),
        Vegetable::new(LocalizedNames::new("Potato", "आलू", "బంగాళాదుంప"))
            .with_price("kg", dec!(25.0))
            .with_price("box", dec!(250.0)),
        Vegetable::new(LocalizedNames::new("Spinach", "पालक", "పాలకూర"))
            .with_price("bunch_small", dec!(15.0))
            .with_price("bunch_big", dec!(25.0)),
        Vegetable::new(LocalizedNames::new("Cauliflower", "फूलगोभी", "కాలిఫ్లవర్"))
            .with_price("piece", dec!(30.0))
            .with_price("dozen", dec!(300.0)),
        Vegetable::new(LocalizedNames::new("Carrot", "गाजर", "కారెట్"))
            .with_price("kg", dec!(35.0))
            .with_price("bunch_small", dec!(20.0)),
        Vegetable::new(LocalizedNames::new("Cucumber", "खीरा", "దోసకాయ"))
            .with_price("kg", dec!(30.0))
            .with_price("piece", dec!(10.0)),
    ]
}

/// Insert the default units and vegetables into an empty catalog.
/// Tables that already hold rows are left alone.
pub async fn seed_defaults<S>(session: &mut S) -> CoreResult<()>
where
    S: CatalogRepository + ?Sized,
{
    if session.list_units().await?.is_empty() {
        let units = default_units();
        for unit in &units {
            session.save_unit(unit).await?;
        }
        info!("Seeded {} vegetable units", units.len());
    }

    if session.list_vegetables().await?.is_empty() {
        let vegetables = default_vegetables();
        for vegetable in &vegetables {
            session.save_vegetable(vegetable).await?;
        }
        info!("Seeded {} vegetables", vegetables.len());
    }

    Ok(())
}

/// Catalog maintenance on top of a store
pub struct CatalogService<S> {
    store: Arc<S>,
}

impl<S: Store> CatalogService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn vegetables(&self) -> CoreResult<Vec<Vegetable>> {
        let mut session = self.store.begin().await?;
        session.list_vegetables().await
    }

    pub async fn vegetable(&self, id: Uuid) -> CoreResult<Option<Vegetable>> {
        let mut session = self.store.begin().await?;
        session.vegetable(id).await
    }

    pub async fn units(&self) -> CoreResult<Vec<VegetableUnit>> {
        let mut session = self.store.begin().await?;
        session.list_units().await
    }

    pub async fn save_vegetable(&self, vegetable: &mut Vegetable) -> CoreResult<()> {
        if vegetable.names.en.trim().is_empty() {
            return Err(CoreError::ValidationError("Vegetable needs an English name".to_string()));
        }
        if let Some((unit, price)) = vegetable.unit_prices.iter().find(|(_, p)| p.is_sign_negative()) {
            return Err(CoreError::ValidationError(format!(
                "Negative price {} for unit {}",
                price, unit
            )));
        }

        vegetable.updated_at = Utc::now();
        let mut session = self.store.begin().await?;
        session.save_vegetable(vegetable).await?;
        session.commit().await
    }

    pub async fn delete_vegetable(&self, id: Uuid) -> CoreResult<()> {
        let mut session = self.store.begin().await?;
        session.delete_vegetable(id).await?;
        session.commit().await
    }

    pub async fn seed(&self) -> CoreResult<()> {
        let mut session = self.store.begin().await?;
        seed_defaults(&mut session).await?;
        session.commit().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_price_lookup() {
        let tomato = Vegetable::new(LocalizedNames::english("Tomato")).with_price("kg", dec!(40));

        assert_eq!(catalog_price(&tomato, "kg").unwrap(), dec!(40));
        match catalog_price(&tomato, "dozen") {
            Err(CoreError::NotFound { entity, key }) => {
                assert_eq!(entity, "Vegetable price");
                assert_eq!(key, "Tomato per dozen");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_default_catalog_prices_use_known_units() {
        let codes: Vec<String> = default_units().into_iter().map(|u| u.code).collect();

        for vegetable in default_vegetables() {
            assert!(!vegetable.unit_prices.is_empty());
            for unit in vegetable.unit_prices.keys() {
                assert!(codes.contains(unit), "{} uses unknown unit {}", vegetable.names.en, unit);
            }
        }
    }
}
