//! `affilia-catalog` — product catalog records and commission lookups.

pub mod product;

pub use product::{
    BundleTier, Product, Variant, find_product, is_bonus_sentinel, BONUS_DEBIT_PRODUCT,
    BONUS_PRODUCT,
};
