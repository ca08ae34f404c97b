#[cfg(test)]
mod tests {
    use crate::cluster::kmeans::{nearest, update_centroids};
    use crate::cluster::point::mean;
    use crate::cluster::{
        Bounds, ClusterError, Initializer, KMeans, MAX_ITERATIONS, Point, Position, Result,
        cluster, cluster_seeded,
    };
    use quickcheck::QuickCheck;

    /// Initializer returning preset centroids
    struct Fixed(Vec<Position>);

    impl Initializer for Fixed {
        fn centroids(&mut self, _bounds: &Bounds, _k: usize) -> Result<Vec<Position>> {
            Ok(self.0.clone())
        }
    }

    fn fixed(centroids: &[(f64, f64)]) -> Fixed {
        Fixed(centroids.iter().map(|&(lat, lon)| Position::new(lat, lon)).collect())
    }

    fn points(coords: &[(f64, f64)]) -> Vec<Point> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(lat, lon))| Point::new(i.to_string(), lat, lon))
            .collect()
    }

    fn two_groups() -> Vec<Point> {
        points(&[(0.0, 0.0), (0.0, 1.0), (10.0, 10.0), (10.0, 11.0)])
    }

    fn member_ids(clusters: &[crate::cluster::Cluster<Point>]) -> Vec<Vec<String>> {
        clusters
            .iter()
            .map(|c| c.members.iter().map(|p| p.id.clone()).collect())
            .collect()
    }

    #[test]
    fn test_invalid_k() {
        for k in [0, -1, i64::MIN] {
            let result = cluster(&two_groups(), k);
            assert!(
                matches!(result, Err(ClusterError::InvalidParameter { .. })),
                "k = {}",
                k
            );
        }
        assert!(KMeans::new(0).is_err());
        assert_eq!(KMeans::new(3).unwrap().k(), 3);
        assert_eq!(KMeans::new(3).unwrap().max_iterations(), MAX_ITERATIONS);
    }

    #[test]
    fn test_invalid_k_on_empty_input() {
        let result = cluster::<Point>(&[], 0);
        assert!(matches!(result, Err(ClusterError::InvalidParameter { .. })));
    }

    #[test]
    fn test_empty_input() {
        let clusters = cluster::<Point>(&[], 3).unwrap();
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_non_finite_rejected() {
        let pts = points(&[(0.0, 0.0), (f64::NAN, 1.0)]);
        let result = cluster(&pts, 2);
        assert_eq!(
            result,
            Err(ClusterError::InvalidParameter {
                name: "points[1]".into(),
                value: "[NaN, 1.0]".into(),
            })
        );
    }

    #[test]
    fn test_initializer_count_checked() {
        let result = KMeans::new(3)
            .unwrap()
            .run(&two_groups(), &mut fixed(&[(0.0, 0.0)]));
        assert!(matches!(result, Err(ClusterError::InvalidParameter { .. })));
    }

    #[test]
    fn test_two_groups_fixed_init() {
        let result = KMeans::new(2)
            .unwrap()
            .run(&two_groups(), &mut fixed(&[(1.0, 1.0), (9.0, 9.0)]))
            .unwrap();

        assert!(result.converged);
        assert_eq!(result.iterations, 2);
        assert_eq!(result.clusters.len(), 2);
        assert_eq!(
            member_ids(&result.clusters),
            vec![vec!["0", "1"], vec!["2", "3"]]
        );
        assert_eq!(result.clusters[0].index, 0);
        assert_eq!(result.clusters[0].centroid, Position::new(0.0, 0.5));
        assert_eq!(result.clusters[1].index, 1);
        assert_eq!(result.clusters[1].centroid, Position::new(10.0, 10.5));
    }

    #[test]
    fn test_two_groups_some_seed_finds_them() {
        let pts = two_groups();
        let found = (0..100u64).any(|seed| {
            let clusters = cluster_seeded(&pts, 2, seed).unwrap();
            clusters.len() == 2
                && clusters.iter().all(|c| c.members.len() == 2)
                && clusters.iter().any(|c| c.centroid == Position::new(0.0, 0.5))
                && clusters.iter().any(|c| c.centroid == Position::new(10.0, 10.5))
        });
        assert!(found);
    }

    #[test]
    fn test_single_cluster_is_mean() {
        let pts = points(&[(40.7128, -74.006), (40.713, -74.0062), (41.0, -74.0), (40.8, -73.95)]);
        let clusters = cluster(&pts, 1).unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].index, 0);
        assert_eq!(clusters[0].members, pts);
        let expected = mean(pts.iter().map(|p| p.position)).unwrap();
        assert_eq!(clusters[0].centroid, expected);
    }

    #[test]
    fn test_more_clusters_than_points() {
        let pts = points(&[(0.0, 0.0), (1.0, 5.0), (2.0, 2.0), (7.0, 3.0), (4.0, 9.0)]);
        for seed in 0..20 {
            let clusters = cluster_seeded(&pts, 8, seed).unwrap();
            assert!(clusters.len() <= pts.len());
            assert!(clusters.iter().all(|c| !c.members.is_empty()));
        }

        // Centroids seeded on the points themselves keep every point alone
        let mut init = fixed(&[
            (0.0, 0.0),
            (1.0, 5.0),
            (2.0, 2.0),
            (7.0, 3.0),
            (4.0, 9.0),
            (50.0, 50.0),
            (60.0, 60.0),
        ]);
        let result = KMeans::new(7).unwrap().run(&pts, &mut init).unwrap();
        assert_eq!(result.clusters.len(), 5);
        assert!(result.clusters.iter().all(|c| c.members.len() == 1));
        assert_eq!(
            result.clusters.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn test_coincident_points_collapse() {
        let pts = points(&[(5.0, 5.0), (5.0, 5.0), (5.0, 5.0), (5.0, 5.0)]);
        let clusters = cluster_seeded(&pts, 3, 7).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members.len(), 4);
        assert_eq!(clusters[0].centroid, Position::new(5.0, 5.0));
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let centroids = [Position::new(0.0, -1.0), Position::new(0.0, 1.0)];
        assert_eq!(nearest(&Position::new(0.0, 0.0), &centroids), 0);

        let centroids = [
            Position::new(5.0, 5.0),
            Position::new(0.0, 1.0),
            Position::new(0.0, -1.0),
        ];
        assert_eq!(nearest(&Position::new(0.0, 0.0), &centroids), 1);

        let result = KMeans::new(2)
            .unwrap()
            .run(&points(&[(0.0, 0.0)]), &mut fixed(&[(0.0, -1.0), (0.0, 1.0)]))
            .unwrap();
        assert_eq!(result.clusters.len(), 1);
        assert_eq!(result.clusters[0].index, 0);
    }

    #[test]
    fn test_empty_centroid_keeps_position() {
        let positions = [Position::new(1.0, 1.0), Position::new(3.0, 3.0)];
        let mut centroids = [Position::new(0.0, 0.0), Position::new(100.0, 100.0)];
        update_centroids(&positions, &[0, 0], &mut centroids);
        assert_eq!(centroids[0], Position::new(2.0, 2.0));
        assert_eq!(centroids[1], Position::new(100.0, 100.0));
    }

    #[test]
    fn test_emptied_slot_regains_members() {
        // Slot 0 holds every point at the start. Round 1 moves both points to
        // slot 1 and slot 0 stays at (0, 14.5). Round 2: slot 1 sits at (0, 5),
        // so (0, 10) goes back to slot 0.
        let pts = points(&[(0.0, 0.0), (0.0, 10.0)]);
        let result = KMeans::new(3)
            .unwrap()
            .run(&pts, &mut fixed(&[(0.0, 14.5), (0.0, 6.0), (0.0, -100.0)]))
            .unwrap();

        assert!(result.converged);
        assert_eq!(result.iterations, 3);
        assert_eq!(
            result.clusters.iter().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1]
        );
        assert_eq!(member_ids(&result.clusters), vec![vec!["1"], vec!["0"]]);
        assert_eq!(result.clusters[0].centroid, Position::new(0.0, 10.0));
        assert_eq!(result.clusters[1].centroid, Position::new(0.0, 0.0));
        assert_eq!(result.clusters[0].display_color, crate::cluster::color_for(0));
    }

    #[test]
    fn test_huge_k_is_an_error() {
        let pts = points(&[(0.0, 0.0), (1.0, 1.0)]);
        for k in [i64::MAX, 1 << 62] {
            let result = cluster_seeded(&pts, k, 1);
            assert!(
                matches!(result, Err(ClusterError::InvalidParameter { ref name, .. }) if name == "k"),
                "k = {}",
                k
            );
        }
    }

    #[test]
    fn test_iteration_bound() {
        let result = KMeans::new(2)
            .unwrap()
            .with_max_iterations(1)
            .run(&two_groups(), &mut fixed(&[(1.0, 1.0), (9.0, 9.0)]))
            .unwrap();
        assert!(!result.converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.clusters.len(), 2);
    }

    #[test]
    fn test_palette_cycles_past_seven() {
        let coords: Vec<(f64, f64)> = (0..9).map(|i| (i as f64 * 10.0, 0.0)).collect();
        let result = KMeans::new(9)
            .unwrap()
            .run(&points(&coords), &mut fixed(&coords))
            .unwrap();

        assert_eq!(result.clusters.len(), 9);
        assert_eq!(result.clusters[7].index, 7);
        assert_eq!(
            result.clusters[7].display_color,
            result.clusters[0].display_color
        );
        assert_ne!(
            result.clusters[6].display_color,
            result.clusters[0].display_color
        );
    }

    fn scaled(coords: &[(i16, i16)]) -> Vec<Point> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(lat, lon))| Point::new(i.to_string(), lat as f64 / 100.0, lon as f64 / 100.0))
            .collect()
    }

    #[test]
    fn prop_total_disjoint_coverage() {
        fn prop(coords: Vec<(i16, i16)>, k: u8, seed: u64) -> bool {
            let pts = scaled(&coords);
            let k = (k % 12) as i64 + 1;
            let clusters = match cluster_seeded(&pts, k, seed) {
                Ok(clusters) => clusters,
                Err(_) => return false,
            };

            let mut seen = vec![0usize; pts.len()];
            for c in &clusters {
                for p in &c.members {
                    let i: usize = p.id.parse().unwrap();
                    seen[i] += 1;
                }
            }
            seen.iter().all(|&n| n == 1)
                && clusters.iter().all(|c| !c.members.is_empty())
                && clusters.len() <= k as usize
                && clusters.windows(2).all(|w| w[0].index < w[1].index)
        }
        QuickCheck::new().quickcheck(prop as fn(Vec<(i16, i16)>, u8, u64) -> bool);
    }

    #[test]
    fn prop_bounded_iterations() {
        fn prop(coords: Vec<(i16, i16)>, k: u8, seed: u64) -> bool {
            let pts = scaled(&coords);
            let kmeans = KMeans::new((k % 12) as i64 + 1).unwrap();
            let mut init = crate::cluster::UniformBounds::seeded(seed);
            match kmeans.run(&pts, &mut init) {
                Ok(result) => {
                    result.iterations <= MAX_ITERATIONS
                        && (result.converged || result.iterations == MAX_ITERATIONS)
                }
                Err(_) => false,
            }
        }
        QuickCheck::new().quickcheck(prop as fn(Vec<(i16, i16)>, u8, u64) -> bool);
    }

    #[test]
    fn prop_seeded_determinism() {
        fn prop(coords: Vec<(i16, i16)>, k: u8, seed: u64) -> bool {
            let pts = scaled(&coords);
            let k = (k % 12) as i64 + 1;
            cluster_seeded(&pts, k, seed) == cluster_seeded(&pts, k, seed)
        }
        QuickCheck::new().quickcheck(prop as fn(Vec<(i16, i16)>, u8, u64) -> bool);
    }
}
