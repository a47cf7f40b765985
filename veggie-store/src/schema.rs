//! Table definitions, applied in order on start.
//! Money and quantities are stored as decimal TEXT, timestamps as RFC 3339 TEXT.

pub const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS vegetable_units (
        id BLOB PRIMARY KEY,
        code TEXT NOT NULL UNIQUE,
        name_en TEXT NOT NULL,
        name_hi TEXT NOT NULL DEFAULT '',
        name_te TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vegetables (
        id BLOB PRIMARY KEY,
        name_en TEXT NOT NULL,
        name_hi TEXT NOT NULL DEFAULT '',
        name_te TEXT NOT NULL DEFAULT '',
        unit_prices TEXT NOT NULL DEFAULT '{}',
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id BLOB PRIMARY KEY,
        name TEXT NOT NULL,
        phone_number TEXT,
        email TEXT,
        address TEXT,
        customer_type TEXT NOT NULL,
        credit_limit TEXT NOT NULL,
        current_credit TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS customer_pricing (
        id BLOB PRIMARY KEY,
        customer_id BLOB NOT NULL REFERENCES customers(id),
        vegetable_id BLOB NOT NULL REFERENCES vegetables(id),
        special_price TEXT NOT NULL,
        unit TEXT NOT NULL,
        valid_from TEXT NOT NULL,
        valid_to TEXT,
        minimum_quantity TEXT NOT NULL,
        discount_percentage TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_customer_pricing_pair
        ON customer_pricing (customer_id, vegetable_id)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS customer_orders (
        id BLOB PRIMARY KEY,
        customer_id BLOB NOT NULL REFERENCES customers(id),
        order_number TEXT NOT NULL UNIQUE,
        order_date TEXT NOT NULL,
        delivery_date TEXT,
        status TEXT NOT NULL,
        total_amount TEXT NOT NULL,
        payment_status TEXT NOT NULL,
        payment_mode TEXT,
        delivery_address TEXT,
        notes TEXT,
        is_recurring INTEGER NOT NULL DEFAULT 0,
        recurrence_pattern TEXT,
        next_order_date TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_items (
        id BLOB PRIMARY KEY,
        order_id BLOB NOT NULL REFERENCES customer_orders(id),
        vegetable_id BLOB NOT NULL REFERENCES vegetables(id),
        quantity TEXT NOT NULL,
        unit TEXT NOT NULL,
        unit_price TEXT NOT NULL,
        total TEXT NOT NULL,
        discount_percentage TEXT NOT NULL,
        discount_amount TEXT NOT NULL,
        final_total TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS inventory_items (
        id BLOB PRIMARY KEY,
        vegetable_id BLOB NOT NULL REFERENCES vegetables(id),
        vegetable_name TEXT NOT NULL,
        quantity TEXT NOT NULL,
        unit TEXT NOT NULL,
        minimum_stock TEXT NOT NULL,
        reorder_point TEXT NOT NULL,
        last_restocked TEXT,
        expiry_date TEXT,
        batch_number TEXT,
        location_code TEXT NOT NULL,
        status TEXT NOT NULL,
        wastage_quantity TEXT NOT NULL,
        wastage_reason TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (vegetable_id, location_code)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS stock_transactions (
        id BLOB PRIMARY KEY,
        inventory_item_id BLOB NOT NULL REFERENCES inventory_items(id),
        kind TEXT NOT NULL,
        quantity TEXT NOT NULL,
        unit TEXT NOT NULL,
        unit_price TEXT NOT NULL,
        reference_number TEXT,
        notes TEXT,
        transaction_date TEXT NOT NULL,
        source_location TEXT,
        destination_location TEXT,
        order_id BLOB,
        vendor_id BLOB,
        customer_id BLOB
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vendors (
        id BLOB PRIMARY KEY,
        name TEXT NOT NULL,
        phone_number TEXT,
        address TEXT,
        email TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invoices (
        id BLOB PRIMARY KEY,
        vendor_id BLOB NOT NULL REFERENCES vendors(id),
        date TEXT NOT NULL,
        total_amount TEXT NOT NULL,
        invoice_number TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invoice_items (
        id BLOB PRIMARY KEY,
        invoice_id BLOB NOT NULL REFERENCES invoices(id),
        vegetable_id BLOB NOT NULL REFERENCES vegetables(id),
        quantity TEXT NOT NULL,
        price TEXT NOT NULL,
        total TEXT NOT NULL
    )
    "#,
];
