//! # Order Repository
//!
//! Submitted orders, their line items and PayPal capture records.
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. SUBMIT                                                              │
//! │     └── insert(&draft) → StoredOrder { status: Pending }               │
//! │         (order row + line rows in one transaction)                     │
//! │                                                                         │
//! │  2. CONFIRM (cash) / CAPTURE (PayPal)                                  │
//! │     └── update_status(id, Confirmed, Pending)                          │
//! │     └── record_payment(id, &tx) → { status: Paid, payment: Paid }      │
//! │         (capture row + status change in one transaction)               │
//! │                                                                         │
//! │  3. (OPTIONAL) CANCEL                                                  │
//! │     └── update_status(id, Cancelled, ...)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bounce_core::{
    CustomerInfo, LineItemKind, Money, OrderDraft, OrderStatus, PaymentMethod, PaymentStatus,
    PaypalTransaction, PriceBreakdown, TimePreference,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};

// =============================================================================
// Stored Types
// =============================================================================

/// An order as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredOrder {
    pub id: String,
    /// Customer-facing reference: `BH-YYYYMMDD-XXXXXX`.
    pub order_number: String,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub customer: CustomerInfo,
    pub delivery_date: NaiveDate,
    pub pickup_date: NaiveDate,
    pub delivery_time: Option<String>,
    pub pickup_time: Option<String>,
    pub delivery_time_preference: TimePreference,
    pub pickup_time_preference: TimePreference,
    pub prices: PriceBreakdown,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line item snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredOrderItem {
    pub id: String,
    pub order_id: String,
    pub position: i64,
    pub kind: LineItemKind,
    pub product_id: Option<String>,
    pub description: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub day_multiplier: u32,
    pub line_total: Money,
}

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: String,
    status: OrderStatus,
    payment_status: PaymentStatus,
    payment_method: PaymentMethod,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    address: String,
    city: String,
    state: String,
    zip_code: String,
    notes: String,
    delivery_date: NaiveDate,
    pickup_date: NaiveDate,
    delivery_time: Option<String>,
    pickup_time: Option<String>,
    delivery_time_preference: TimePreference,
    pickup_time_preference: TimePreference,
    rental_days: i64,
    day_multiplier: i64,
    bouncer_subtotal_cents: i64,
    extras_total_cents: i64,
    specific_time_charge_cents: i64,
    delivery_fee_cents: i64,
    overnight_fee_cents: i64,
    subtotal_cents: i64,
    tax_cents: i64,
    processing_fee_cents: i64,
    discount_cents: i64,
    total_cents: i64,
    deposit_cents: i64,
    balance_due_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for StoredOrder {
    type Error = DbError;

    fn try_from(row: OrderRow) -> DbResult<Self> {
        let prices = PriceBreakdown {
            bouncer_subtotal: Money::from_cents(row.bouncer_subtotal_cents),
            extras_total: Money::from_cents(row.extras_total_cents),
            specific_time_charge: Money::from_cents(row.specific_time_charge_cents),
            delivery_fee: Money::from_cents(row.delivery_fee_cents),
            overnight_fee: Money::from_cents(row.overnight_fee_cents),
            subtotal: Money::from_cents(row.subtotal_cents),
            tax_amount: Money::from_cents(row.tax_cents),
            processing_fee: Money::from_cents(row.processing_fee_cents),
            discount_amount: Money::from_cents(row.discount_cents),
            total_amount: Money::from_cents(row.total_cents),
            deposit_amount: Money::from_cents(row.deposit_cents),
            balance_due: Money::from_cents(row.balance_due_cents),
            day_multiplier: to_u32("day_multiplier", row.day_multiplier)?,
            rental_days: i32::try_from(row.rental_days)
                .map_err(|_| DbError::InvalidData(format!("rental_days {}", row.rental_days)))?,
        };

        Ok(StoredOrder {
            id: row.id,
            order_number: row.order_number,
            status: row.status,
            payment_status: row.payment_status,
            payment_method: row.payment_method,
            customer: CustomerInfo {
                name: row.customer_name,
                email: row.customer_email,
                phone: row.customer_phone,
                address: row.address,
                city: row.city,
                state: row.state,
                zip_code: row.zip_code,
                notes: row.notes,
            },
            delivery_date: row.delivery_date,
            pickup_date: row.pickup_date,
            delivery_time: row.delivery_time,
            pickup_time: row.pickup_time,
            delivery_time_preference: row.delivery_time_preference,
            pickup_time_preference: row.pickup_time_preference,
            prices,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: String,
    order_id: String,
    position: i64,
    kind: LineItemKind,
    product_id: Option<String>,
    description: String,
    unit_price_cents: i64,
    quantity: i64,
    day_multiplier: i64,
    line_total_cents: i64,
}

impl TryFrom<OrderItemRow> for StoredOrderItem {
    type Error = DbError;

    fn try_from(row: OrderItemRow) -> DbResult<Self> {
        Ok(StoredOrderItem {
            id: row.id,
            order_id: row.order_id,
            position: row.position,
            kind: row.kind,
            product_id: row.product_id,
            description: row.description,
            unit_price: Money::from_cents(row.unit_price_cents),
            quantity: to_u32("quantity", row.quantity)?,
            day_multiplier: to_u32("day_multiplier", row.day_multiplier)?,
            line_total: Money::from_cents(row.line_total_cents),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    transaction_id: String,
    paypal_order_id: String,
    payer_email: Option<String>,
    amount_cents: i64,
    status: String,
    created_at: DateTime<Utc>,
}

impl From<PaymentRow> for PaypalTransaction {
    fn from(row: PaymentRow) -> Self {
        PaypalTransaction {
            transaction_id: row.transaction_id,
            paypal_order_id: row.paypal_order_id,
            payer_email: row.payer_email,
            amount: Money::from_cents(row.amount_cents),
            status: row.status,
            created_at: row.created_at,
        }
    }
}

fn to_u32(column: &str, value: i64) -> DbResult<u32> {
    u32::try_from(value).map_err(|_| DbError::InvalidData(format!("{} {}", column, value)))
}

const SELECT_ORDER: &str = r#"
    SELECT
        id, order_number, status, payment_status, payment_method,
        customer_name, customer_email, customer_phone,
        address, city, state, zip_code, notes,
        delivery_date, pickup_date, delivery_time, pickup_time,
        delivery_time_preference, pickup_time_preference,
        rental_days, day_multiplier,
        bouncer_subtotal_cents, extras_total_cents, specific_time_charge_cents,
        delivery_fee_cents, overnight_fee_cents, subtotal_cents, tax_cents,
        processing_fee_cents, discount_cents, total_cents, deposit_cents,
        balance_due_cents, created_at, updated_at
    FROM orders
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for order operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Stores a draft as a pending order.
    ///
    /// The order row and every line row are written in one transaction.
    pub async fn insert(&self, draft: &OrderDraft) -> DbResult<StoredOrder> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let order_number = generate_order_number(draft.delivery_date, &id);
        let prices = &draft.prices;
        let customer = &draft.customer;

        debug!(id = %id, order_number = %order_number, "Inserting order");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, order_number, status, payment_status, payment_method,
                customer_name, customer_email, customer_phone,
                address, city, state, zip_code, notes,
                delivery_date, pickup_date, delivery_time, pickup_time,
                delivery_time_preference, pickup_time_preference,
                rental_days, day_multiplier,
                bouncer_subtotal_cents, extras_total_cents, specific_time_charge_cents,
                delivery_fee_cents, overnight_fee_cents, subtotal_cents, tax_cents,
                processing_fee_cents, discount_cents, total_cents, deposit_cents,
                balance_due_cents, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8,
                ?9, ?10, ?11, ?12, ?13,
                ?14, ?15, ?16, ?17,
                ?18, ?19,
                ?20, ?21,
                ?22, ?23, ?24,
                ?25, ?26, ?27, ?28,
                ?29, ?30, ?31, ?32,
                ?33, ?34, ?34
            )
            "#,
        )
        .bind(&id)
        .bind(&order_number)
        .bind(OrderStatus::Pending)
        .bind(PaymentStatus::Pending)
        .bind(draft.payment_method)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.city)
        .bind(&customer.state)
        .bind(&customer.zip_code)
        .bind(&draft.notes)
        .bind(draft.delivery_date)
        .bind(draft.pickup_date)
        .bind(&draft.delivery_time)
        .bind(&draft.pickup_time)
        .bind(draft.delivery_time_preference)
        .bind(draft.pickup_time_preference)
        .bind(i64::from(prices.rental_days))
        .bind(i64::from(prices.day_multiplier))
        .bind(prices.bouncer_subtotal.cents())
        .bind(prices.extras_total.cents())
        .bind(prices.specific_time_charge.cents())
        .bind(prices.delivery_fee.cents())
        .bind(prices.overnight_fee.cents())
        .bind(prices.subtotal.cents())
        .bind(prices.tax_amount.cents())
        .bind(prices.processing_fee.cents())
        .bind(prices.discount_amount.cents())
        .bind(prices.total_amount.cents())
        .bind(prices.deposit_amount.cents())
        .bind(prices.balance_due.cents())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for (position, item) in (1_i64..).zip(draft.items.iter()) {
            sqlx::query(
                r#"
                INSERT INTO order_items (
                    id, order_id, position, kind, product_id, description,
                    unit_price_cents, quantity, day_multiplier, line_total_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&id)
            .bind(position)
            .bind(item.kind)
            .bind(&item.product_id)
            .bind(&item.description)
            .bind(item.unit_price.cents())
            .bind(i64::from(item.quantity))
            .bind(i64::from(item.day_multiplier))
            .bind(item.line_total.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            order_number = %order_number,
            items = draft.items.len(),
            total = %prices.total_amount,
            "Order stored"
        );

        Ok(StoredOrder {
            id,
            order_number,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_method: draft.payment_method,
            customer: customer.clone(),
            delivery_date: draft.delivery_date,
            pickup_date: draft.pickup_date,
            delivery_time: draft.delivery_time.clone(),
            pickup_time: draft.pickup_time.clone(),
            delivery_time_preference: draft.delivery_time_preference,
            pickup_time_preference: draft.pickup_time_preference,
            prices: *prices,
            created_at: now,
            updated_at: now,
        })
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<StoredOrder>> {
        let sql = format!("{} WHERE id = ?1", SELECT_ORDER);
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(StoredOrder::try_from).transpose()
    }

    /// Gets an order by its customer-facing number.
    pub async fn get_by_number(&self, order_number: &str) -> DbResult<Option<StoredOrder>> {
        let sql = format!("{} WHERE order_number = ?1", SELECT_ORDER);
        let row: Option<OrderRow> = sqlx::query_as(&sql)
            .bind(order_number)
            .fetch_optional(&self.pool)
            .await?;

        row.map(StoredOrder::try_from).transpose()
    }

    /// Line items of an order, in the order they were billed.
    pub async fn items_for(&self, order_id: &str) -> DbResult<Vec<StoredOrderItem>> {
        let rows: Vec<OrderItemRow> = sqlx::query_as(
            r#"
            SELECT
                id, order_id, position, kind, product_id, description,
                unit_price_cents, quantity, day_multiplier, line_total_cents
            FROM order_items
            WHERE order_id = ?1
            ORDER BY position
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(StoredOrderItem::try_from).collect()
    }

    /// Orders delivered on one day (the driver's route for that date).
    pub async fn list_for_delivery_date(&self, date: NaiveDate) -> DbResult<Vec<StoredOrder>> {
        let sql = format!(
            "{} WHERE delivery_date = ?1 AND status != 'cancelled' ORDER BY created_at",
            SELECT_ORDER
        );
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(StoredOrder::try_from).collect()
    }

    /// Most recently submitted orders first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<StoredOrder>> {
        let sql = format!("{} ORDER BY created_at DESC LIMIT ?1", SELECT_ORDER);
        let rows: Vec<OrderRow> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(StoredOrder::try_from).collect()
    }

    /// Sets order and payment status.
    pub async fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        payment_status: PaymentStatus,
    ) -> DbResult<()> {
        debug!(id = %id, status = ?status, payment_status = ?payment_status, "Updating order status");

        let result = sqlx::query(
            "UPDATE orders SET status = ?2, payment_status = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(status)
        .bind(payment_status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Order", id));
        }

        Ok(())
    }

    /// Stores a PayPal capture and marks the order paid, atomically.
    pub async fn record_payment(&self, order_id: &str, transaction: &PaypalTransaction) -> DbResult<()> {
        debug!(
            order_id = %order_id,
            transaction_id = %transaction.transaction_id,
            amount = %transaction.amount,
            "Recording payment"
        );

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE orders SET status = ?2, payment_status = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(order_id)
        .bind(OrderStatus::Paid)
        .bind(PaymentStatus::Paid)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // dropping tx rolls back
            return Err(DbError::not_found("Order", order_id));
        }

        sqlx::query(
            r#"
            INSERT INTO payment_transactions (
                transaction_id, order_id, paypal_order_id, payer_email,
                amount_cents, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&transaction.transaction_id)
        .bind(order_id)
        .bind(&transaction.paypal_order_id)
        .bind(&transaction.payer_email)
        .bind(transaction.amount.cents())
        .bind(&transaction.status)
        .bind(transaction.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(order_id = %order_id, "Payment recorded");
        Ok(())
    }

    /// PayPal captures recorded for an order.
    pub async fn payments_for(&self, order_id: &str) -> DbResult<Vec<PaypalTransaction>> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT transaction_id, paypal_order_id, payer_email, amount_cents, status, created_at
            FROM payment_transactions
            WHERE order_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PaypalTransaction::from).collect())
    }

    /// Number of stored orders.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Order number in format: `BH-YYYYMMDD-XXXXXX`
///
/// - YYYYMMDD: delivery date
/// - XXXXXX: first six hex digits of the order id, uppercased
///
/// ## Example
/// `BH-20240601-3F9A1C`
pub fn generate_order_number(delivery_date: NaiveDate, order_id: &str) -> String {
    let suffix: String = order_id
        .chars()
        .filter(char::is_ascii_hexdigit)
        .take(6)
        .collect::<String>()
        .to_uppercase();

    format!("BH-{}-{}", delivery_date.format("%Y%m%d"), suffix)
}

// =============================================================================
// Unit Tests
// =============================================================================
