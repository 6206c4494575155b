//! # Schema
//!
//! Idempotent DDL applied at startup and by the `migrate` command.

/// Statements run in order. Every one is safe to repeat.
pub const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS persons (
        id          TEXT PRIMARY KEY NOT NULL,
        first_name  TEXT NOT NULL,
        last_name   TEXT NOT NULL,
        email       TEXT NOT NULL UNIQUE,
        created_at  TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_persons_email ON persons (email)",
    "CREATE INDEX IF NOT EXISTS idx_persons_last_name ON persons (last_name)",
    "CREATE INDEX IF NOT EXISTS idx_persons_created_at ON persons (created_at)",
    "CREATE TABLE IF NOT EXISTS products (
        id           TEXT PRIMARY KEY NOT NULL,
        name         TEXT NOT NULL,
        sku          TEXT NOT NULL UNIQUE,
        price_cents  INTEGER NOT NULL CHECK (price_cents >= 0),
        owner_id     TEXT REFERENCES persons (id) ON DELETE SET NULL,
        created_at   TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_products_sku ON products (sku)",
    "CREATE INDEX IF NOT EXISTS idx_products_price ON products (price_cents)",
    "CREATE INDEX IF NOT EXISTS idx_products_created_at ON products (created_at)",
    "CREATE INDEX IF NOT EXISTS idx_products_name ON products (name)",
    "CREATE INDEX IF NOT EXISTS idx_products_owner ON products (owner_id)",
    "CREATE TABLE IF NOT EXISTS users (
        id             TEXT PRIMARY KEY NOT NULL,
        username       TEXT NOT NULL UNIQUE,
        email          TEXT,
        password_hash  TEXT NOT NULL,
        created_at     TEXT NOT NULL
    )",
];
