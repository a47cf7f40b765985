use rust_decimal::Decimal;
use veggie_catalog::PriceQuote;
use veggie_core::{CoreError, CoreResult};
use veggie_shared::models::{InvoiceItem, OrderItem};

/// Fill in price, discount and totals of an order line from its quote
pub fn price_line(item: &mut OrderItem, quote: &PriceQuote) -> CoreResult<()> {
    let overflow = || CoreError::overflow(format!("line total for vegetable {}", item.vegetable_id));

    let total = item.quantity.checked_mul(quote.unit_price).ok_or_else(overflow)?;
    let discount_amount = total
        .checked_mul(quote.discount_percentage)
        .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(overflow)?;
    let final_total = total.checked_sub(discount_amount).ok_or_else(overflow)?;

    item.unit_price = quote.unit_price;
    item.discount_percentage = quote.discount_percentage;
    item.total = total;
    item.discount_amount = discount_amount;
    item.final_total = final_total;
    Ok(())
}

/// Sum of final line totals
pub fn order_total(items: &[OrderItem]) -> CoreResult<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |sum, item| {
        sum.checked_add(item.final_total)
            .ok_or_else(|| CoreError::overflow("order total"))
    })
}

pub fn price_invoice_line(item: &mut InvoiceItem) -> CoreResult<()> {
    item.total = item
        .quantity
        .checked_mul(item.price)
        .ok_or_else(|| CoreError::overflow(format!("invoice line for vegetable {}", item.vegetable_id)))?;
    Ok(())
}

pub fn invoice_total(items: &[InvoiceItem]) -> CoreResult<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |sum, item| {
        sum.checked_add(item.total)
            .ok_or_else(|| CoreError::overflow("invoice total"))
    })
}
