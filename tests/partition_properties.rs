use heatdist::heat_error::HeatError;
use heatdist::topology::{RankTopology, RowBand, partition_rows};
use proptest::prelude::*;

proptest! {
    #[test]
    fn bands_are_a_disjoint_cover(n in 1usize..600, size in 1usize..48) {
        prop_assume!(n >= size);
        let bands = partition_rows(n, size).unwrap();
        prop_assert_eq!(bands.len(), size);
        prop_assert_eq!(bands[0].start, 0);
        prop_assert_eq!(bands[size - 1].stop, n);
        for pair in bands.windows(2) {
            prop_assert_eq!(pair[0].stop, pair[1].start);
        }
        for b in &bands {
            prop_assert!(b.height() >= 1);
        }
        let total: usize = bands.iter().map(RowBand::height).sum();
        prop_assert_eq!(total, n);
    }

    #[test]
    fn only_the_last_band_is_taller(n in 1usize..600, size in 1usize..48) {
        prop_assume!(n >= size);
        let bands = partition_rows(n, size).unwrap();
        let h = n / size;
        for b in &bands[..size - 1] {
            prop_assert_eq!(b.height(), h);
        }
        prop_assert_eq!(bands[size - 1].height(), h + n % size);
    }

    #[test]
    fn too_many_ranks_is_an_error(n in 0usize..32, extra in 1usize..8) {
        let size = n + extra;
        prop_assert_eq!(
            partition_rows(n, size),
            Err(HeatError::EmptyBand { n, ranks: size })
        );
    }

    #[test]
    fn each_row_has_exactly_one_owner(n in 1usize..200, size in 1usize..16) {
        prop_assume!(n >= size);
        let bands = partition_rows(n, size).unwrap();
        for row in 0..n {
            let owners = bands.iter().filter(|b| b.contains(row)).count();
            prop_assert_eq!(owners, 1);
        }
    }
}

#[test]
fn neighbours_match_adjacent_bands() {
    let n = 10;
    let size = 4;
    let bands = partition_rows(n, size).unwrap();
    for rank in 0..size {
        let topo = RankTopology::new(rank, size).unwrap();
        if let Some(up) = topo.above() {
            assert_eq!(bands[up].stop, bands[rank].start);
        }
        if let Some(down) = topo.below() {
            assert_eq!(bands[rank].stop, bands[down].start);
        }
    }
}
