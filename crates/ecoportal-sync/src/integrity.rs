use std::collections::HashSet;

use ecoportal_core::{Brand, Sector};

/// Percentage of declared brand references that resolve inside the snapshot.
///
/// Each non-null `sector_id` must name a listed sector and each non-null
/// `parent_id` must name a listed brand. Rounds half up. A snapshot with no
/// references at all scores 100.
#[must_use]
pub fn integrity_score(sectors: &[Sector], brands: &[Brand]) -> u8 {
    let sector_ids: HashSet<i64> = sectors.iter().map(|s| s.id).collect();
    let brand_ids: HashSet<i64> = brands.iter().map(|b| b.id).collect();

    let mut total: u64 = 0;
    let mut valid: u64 = 0;

    for brand in brands {
        if let Some(sector_id) = brand.sector_id {
            total += 1;
            if sector_ids.contains(&sector_id) {
                valid += 1;
            }
        }
        if let Some(parent_id) = brand.parent_id {
            total += 1;
            if brand_ids.contains(&parent_id) {
                valid += 1;
            }
        }
    }

    if total == 0 {
        return 100;
    }

    let rounded = (valid * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sector(id: i64) -> Sector {
        Sector {
            id,
            name: format!("Sector {id}"),
            emoji: String::new(),
            description: String::new(),
            brand_count: 0,
            subnode_count: 0,
        }
    }

    fn brand(id: i64, sector_id: Option<i64>, parent_id: Option<i64>) -> Brand {
        Brand {
            id,
            name: format!("Brand {id}"),
            description: String::new(),
            integration: String::new(),
            status: "active".to_string(),
            is_core: false,
            sector_id,
            parent_id,
        }
    }

    #[test]
    fn half_of_sector_references_resolve() {
        let score = integrity_score(
            &[sector(1)],
            &[brand(10, Some(1), None), brand(11, Some(99), None)],
        );
        assert_eq!(score, 50);
    }

    #[test]
    fn no_references_is_fully_consistent() {
        assert_eq!(integrity_score(&[], &[]), 100);
        assert_eq!(
            integrity_score(&[sector(1)], &[brand(1, None, None), brand(2, None, None)]),
            100
        );
    }

    #[test]
    fn dangling_parent_counts_as_gap() {
        let score = integrity_score(
            &[sector(1)],
            &[brand(10, Some(1), None), brand(11, Some(1), Some(404))],
        );
        // 3 references, 2 valid
        assert_eq!(score, 67);
    }

    #[test]
    fn nothing_resolves() {
        let score = integrity_score(&[], &[brand(1, Some(5), Some(6))]);
        assert_eq!(score, 0);
    }

    #[test]
    fn rounds_half_up() {
        // 1 of 8 = 12.5%
        let mut brands = vec![brand(1, Some(1), None)];
        brands.extend((2..=8).map(|id| brand(id, Some(99), None)));
        assert_eq!(integrity_score(&[sector(1)], &brands), 13);
    }

    #[test]
    fn score_stays_within_bounds() {
        for valid in 0..=5_i64 {
            let mut brands: Vec<Brand> = (0..valid).map(|id| brand(id, Some(1), None)).collect();
            brands.extend((10..15).map(|id| brand(id, Some(2), None)));
            let score = integrity_score(&[sector(1)], &brands);
            assert!(score <= 100);
        }
    }
}
