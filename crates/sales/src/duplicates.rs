//! Duplicate order detection.
//!
//! The detector walks all sales in chronological order and flags every order
//! that repeats an earlier order's product together with either the customer
//! name or the customer phone. The earliest order for a key is the keeper;
//! everything after it is a duplicate.
//!
//! # Invariants
//! - The scan is a pure function of the sale set: re-running it on an already
//!   annotated set changes nothing.
//! - `Test` orders and bonus entries neither seed keys nor get flagged.
//! - An order already marked `Duplicato` still seeds its keys, so clearing
//!   one duplicate never un-flags its siblings.

use std::collections::{HashMap, HashSet};

use affilia_core::{ProductId, SaleId};

use crate::sale::Sale;
use crate::status::SaleStatus;

/// Matching key: product plus a normalized customer identity.
type DupKey = (ProductId, String);

fn name_key(sale: &Sale) -> Option<DupKey> {
    let name = sale.customer_name.trim().to_lowercase();
    (!name.is_empty()).then(|| (sale.product_id.clone(), name))
}

fn phone_key(sale: &Sale) -> Option<DupKey> {
    let phone: String = sale
        .customer_phone
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    (!phone.is_empty()).then(|| (sale.product_id.clone(), phone))
}

/// Scan the whole sale set and return the ids that should carry `Duplicato`.
///
/// Sales are walked by ascending `sale_date`; on equal dates the input order
/// decides, so the scan is deterministic for a stable snapshot.
pub fn duplicate_ids(sales: &[Sale]) -> HashSet<SaleId> {
    let mut ordered: Vec<&Sale> = sales
        .iter()
        .filter(|s| s.status != SaleStatus::Test && !s.is_bonus)
        .collect();
    ordered.sort_by_key(|s| s.sale_date);

    let mut first_seen: HashMap<DupKey, &SaleId> = HashMap::new();
    let mut duplicates = HashSet::new();

    for sale in ordered {
        let mut repeat = false;
        for key in [name_key(sale), phone_key(sale)].into_iter().flatten() {
            match first_seen.entry(key) {
                std::collections::hash_map::Entry::Occupied(keeper) => {
                    if *keeper.get() != &sale.id {
                        repeat = true;
                    }
                }
                std::collections::hash_map::Entry::Vacant(slot) => {
                    slot.insert(&sale.id);
                }
            }
        }
        if repeat {
            duplicates.insert(sale.id.clone());
        }
    }

    duplicates
}

/// Re-derive duplicate annotations for the whole sale set.
///
/// Flagged sales are rewritten to `Duplicato`; everything else passes through
/// untouched. Sales already carrying `Duplicato` are left as they are, so the
/// pass is idempotent and preserves `status_updated_at` on stable flags.
pub fn annotate(sales: &[Sale]) -> Vec<Sale> {
    let flagged = duplicate_ids(sales);
    if flagged.is_empty() {
        return sales.to_vec();
    }

    tracing::debug!(count = flagged.len(), "duplicate orders flagged");

    sales
        .iter()
        .map(|sale| {
            if flagged.contains(&sale.id) && sale.status != SaleStatus::Duplicato {
                let mut marked = sale.clone();
                marked.status = SaleStatus::Duplicato;
                marked
            } else {
                sale.clone()
            }
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use affilia_core::{Money, ProductId, UserId};
    use chrono::{DateTime, Duration, Utc};
    use proptest::prelude::*;

    use crate::sale::Address;

    fn base_date() -> DateTime<Utc> {
        "2024-01-01T10:00:00Z".parse().unwrap()
    }

    fn sale(id: &str, product: &str, name: &str, phone: &str, offset_hours: i64) -> Sale {
        Sale {
            id: SaleId::from(id),
            product_id: ProductId::from(product),
            product_name: String::new(),
            affiliate_id: UserId::from("a1"),
            affiliate_name: String::new(),
            bundle_id: None,
            variant_id: None,
            sale_amount: Money::from_cents(4990),
            commission_amount: Money::from_cents(1200),
            quantity: 1,
            status: SaleStatus::InAttesa,
            status_updated_at: None,
            last_contacted_by: None,
            last_contacted_by_name: None,
            is_bonus: false,
            customer_name: name.to_string(),
            customer_phone: phone.to_string(),
            customer_email: String::new(),
            address: Address::default(),
            sub_id: String::new(),
            sale_date: base_date() + Duration::hours(offset_hours),
            tracking_code: None,
            notes: None,
            contact_history: Vec::new(),
        }
    }

    #[test]
    fn earliest_order_is_the_keeper() {
        let sales = vec![
            sale("s2", "p1", "Mario Rossi", "333 111", 5),
            sale("s1", "p1", "Mario Rossi", "333 222", 0),
        ];

        let dups = duplicate_ids(&sales);
        assert_eq!(dups, HashSet::from([SaleId::from("s2")]));
    }

    #[test]
    fn name_match_is_case_and_whitespace_insensitive() {
        let sales = vec![
            sale("s1", "p1", "Mario Rossi", "333 111", 0),
            sale("s2", "p1", "  MARIO ROSSI ", "999 999", 1),
        ];

        assert!(duplicate_ids(&sales).contains(&SaleId::from("s2")));
    }

    #[test]
    fn phone_match_ignores_spacing() {
        let sales = vec![
            sale("s1", "p1", "Mario Rossi", "333 123 4567", 0),
            sale("s2", "p1", "Luigi Verdi", "3331234567", 1),
        ];

        assert!(duplicate_ids(&sales).contains(&SaleId::from("s2")));
    }

    #[test]
    fn same_customer_different_product_is_not_a_duplicate() {
        let sales = vec![
            sale("s1", "p1", "Mario Rossi", "333 111", 0),
            sale("s2", "p2", "Mario Rossi", "333 111", 1),
        ];

        assert!(duplicate_ids(&sales).is_empty());
    }

    #[test]
    fn empty_name_and_phone_never_match_each_other() {
        let sales = vec![
            sale("s1", "p1", "", "  ", 0),
            sale("s2", "p1", "", "", 1),
        ];

        assert!(duplicate_ids(&sales).is_empty());
    }

    #[test]
    fn test_orders_and_bonus_entries_are_invisible() {
        let mut tester = sale("s1", "p1", "Mario Rossi", "333 111", 0);
        tester.status = SaleStatus::Test;
        let mut bonus = sale("s2", "p1", "Mario Rossi", "333 111", 1);
        bonus.is_bonus = true;
        let real = sale("s3", "p1", "Mario Rossi", "333 111", 2);

        // Neither the test order nor the bonus seeds a key, so the real order
        // is the first of its kind.
        assert!(duplicate_ids(&[tester, bonus, real]).is_empty());
    }

    #[test]
    fn cancelled_orders_still_seed_keys() {
        let mut first = sale("s1", "p1", "Mario Rossi", "333 111", 0);
        first.status = SaleStatus::Annullato;
        let second = sale("s2", "p1", "Mario Rossi", "333 111", 1);

        assert!(duplicate_ids(&[first, second]).contains(&SaleId::from("s2")));
    }

    #[test]
    fn annotate_rewrites_only_fresh_flags() {
        let sales = vec![
            sale("s1", "p1", "Mario Rossi", "333 111", 0),
            sale("s2", "p1", "Mario Rossi", "333 111", 1),
        ];

        let annotated = annotate(&sales);
        assert_eq!(annotated[0].status, SaleStatus::InAttesa);
        assert_eq!(annotated[1].status, SaleStatus::Duplicato);

        // A second pass over the annotated set is a no-op.
        let again = annotate(&annotated);
        assert_eq!(again, annotated);
    }

    #[test]
    fn already_marked_duplicates_keep_seeding_keys() {
        let mut second = sale("s2", "p1", "Mario Rossi", "333 111", 1);
        second.status = SaleStatus::Duplicato;
        let sales = vec![
            sale("s1", "p1", "Mario Rossi", "333 111", 0),
            second,
            sale("s3", "p1", "mario rossi", "999 999", 2),
        ];

        let annotated = annotate(&sales);
        assert_eq!(annotated[1].status, SaleStatus::Duplicato);
        assert_eq!(annotated[2].status, SaleStatus::Duplicato);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn annotation_is_idempotent(
            seeds in proptest::collection::vec((0u8..4, 0u8..4, 0u8..4, 0i64..48), 0..24),
        ) {
            let sales: Vec<Sale> = seeds
                .iter()
                .enumerate()
                .map(|(i, (product, name, phone, hours))| {
                    sale(
                        &format!("s{i}"),
                        &format!("p{product}"),
                        &format!("Cliente {name}"),
                        &format!("333 000 {phone}"),
                        *hours,
                    )
                })
                .collect();

            let once = annotate(&sales);
            let twice = annotate(&once);
            prop_assert_eq!(once, twice);
        }
    }
}
