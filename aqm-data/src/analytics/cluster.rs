//! Station clustering.

use super::{distinct_ids, TimeRange};
use crate::{
    catalog::Catalogs,
    generator::{random_id, random_pollutants, random_weather},
};
use aqm_core::pollutant::PollutantReadings;
use chrono::{DateTime, Utc};
use log::debug;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

pub const CLUSTER_ALGORITHM: &str = "K-means clustering";
pub const DISTANCE_METRIC: &str = "euclidean";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CentroidWeather {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub aqi: u32,
    pub pollutants: PollutantReadings,
    pub weather: CentroidWeather,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// 1-based position of the cluster.
    pub id: u32,
    pub size: usize,
    pub centroid: Centroid,
    pub characteristics: Vec<String>,
    pub stations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterParameters {
    pub k: usize,
    pub iterations: u32,
    pub distance_metric: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterQuality {
    pub silhouette_score: f64,
    pub davies_bouldin_index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAnalysis {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub station_ids: Vec<String>,
    pub time_range: TimeRange,
    pub clusters: Vec<Cluster>,
    pub algorithm: String,
    pub parameters: ClusterParameters,
    pub quality: ClusterQuality,
}

/// Split `stations` into `k` non-empty groups.
///
/// Each station joins the first group whose coin flip lands heads and falls
/// through to the last group otherwise. Groups left empty then take one
/// station from a group that can spare it. Requires `1 <= k <= stations.len()`.
fn partition<R: Rng + ?Sized>(rng: &mut R, stations: &[String], k: usize) -> Vec<Vec<String>> {
    let mut groups: Vec<Vec<String>> = vec![Vec::new(); k];
    for station in stations {
        let target = (0..k - 1).find(|_| rng.gen_bool(0.5)).unwrap_or(k - 1);
        groups[target].push(station.clone());
    }

    for empty in 0..k {
        if !groups[empty].is_empty() {
            continue;
        }
        let donors: Vec<usize> = (0..k).filter(|&i| groups[i].len() >= 2).collect();
        // k <= stations.len() guarantees a donor while any group is empty
        if let Some(&donor) = donors.choose(rng) {
            let idx = rng.gen_range(0..groups[donor].len());
            let moved = groups[donor].remove(idx);
            groups[empty].push(moved);
        }
    }
    groups
}

fn random_centroid<R: Rng + ?Sized>(rng: &mut R) -> Centroid {
    let aqi = rng.gen_range(30..230);
    let pollutants = random_pollutants(rng);
    let weather = random_weather(rng);
    Centroid {
        aqi,
        pollutants,
        weather: CentroidWeather {
            temperature: weather.temperature,
            humidity: weather.humidity,
            wind_speed: weather.wind_speed,
        },
    }
}

/// Group `station_ids` into 2 to 4 clusters, fewer when there are fewer
/// distinct stations. Every distinct id lands in exactly one cluster.
pub fn cluster_analysis<R: Rng + ?Sized>(
    rng: &mut R,
    catalogs: &Catalogs,
    station_ids: &[String],
    time_range: TimeRange,
    generated_at: DateTime<Utc>,
) -> ClusterAnalysis {
    let stations = distinct_ids(station_ids);
    let k = rng.gen_range(2..=4).min(stations.len());

    let clusters: Vec<Cluster> = if k == 0 {
        Vec::new()
    } else {
        partition(rng, &stations, k)
            .into_iter()
            .enumerate()
            .map(|(i, members)| Cluster {
                id: i as u32 + 1,
                size: members.len(),
                centroid: random_centroid(rng),
                characteristics: catalogs
                    .characteristic_templates
                    .choose_multiple(rng, 2)
                    .cloned()
                    .collect(),
                stations: members,
            })
            .collect()
    };
    debug!(
        "Clustered {} stations into {} groups",
        stations.len(),
        clusters.len()
    );

    ClusterAnalysis {
        id: random_id(rng, "cluster", &generated_at),
        generated_at,
        station_ids: station_ids.to_vec(),
        time_range,
        clusters,
        algorithm: CLUSTER_ALGORITHM.to_string(),
        parameters: ClusterParameters {
            k,
            iterations: rng.gen_range(100..200),
            distance_metric: DISTANCE_METRIC.to_string(),
        },
        quality: ClusterQuality {
            silhouette_score: rng.gen_range(0.65..0.95),
            davies_bouldin_index: rng.gen_range(0.3..0.8),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use rand::{rngs::StdRng, SeedableRng};

    fn ids(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("station-{i:03}")).collect()
    }

    fn range() -> TimeRange {
        TimeRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_clusters_partition_the_stations() {
        let catalogs = Catalogs::default();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let input = ids(5);
            let analysis = cluster_analysis(&mut rng, &catalogs, &input, range(), now());
            assert!((2..=4).contains(&analysis.clusters.len()));
            assert_eq!(analysis.parameters.k, analysis.clusters.len());

            let mut seen: Vec<String> = Vec::new();
            for cluster in &analysis.clusters {
                assert!(!cluster.stations.is_empty(), "seed {seed}");
                assert_eq!(cluster.size, cluster.stations.len());
                seen.extend(cluster.stations.iter().cloned());
            }
            seen.sort();
            assert_eq!(seen, input, "seed {seed}");
        }
    }

    #[test]
    fn test_duplicates_and_small_inputs() {
        let catalogs = Catalogs::default();
        let input = vec!["a".to_string(), "a".to_string()];
        for seed in 0..20 {
            let analysis =
                cluster_analysis(&mut StdRng::seed_from_u64(seed), &catalogs, &input, range(), now());
            assert_eq!(analysis.clusters.len(), 1);
            assert_eq!(analysis.clusters[0].stations, vec!["a"]);
            assert_eq!(analysis.station_ids, input);
        }
    }

    #[test]
    fn test_empty_input_has_no_clusters() {
        let analysis =
            cluster_analysis(&mut StdRng::seed_from_u64(1), &Catalogs::default(), &[], range(), now());
        assert!(analysis.clusters.is_empty());
        assert_eq!(analysis.parameters.k, 0);
    }

    #[test]
    fn test_characteristics_and_scores() {
        let catalogs = Catalogs::default();
        let analysis =
            cluster_analysis(&mut StdRng::seed_from_u64(9), &catalogs, &ids(5), range(), now());
        for cluster in &analysis.clusters {
            assert_eq!(cluster.characteristics.len(), 2);
            assert_ne!(cluster.characteristics[0], cluster.characteristics[1]);
            assert!((30..230).contains(&cluster.centroid.aqi));
        }
        assert!((0.65..0.95).contains(&analysis.quality.silhouette_score));
        assert!((0.3..0.8).contains(&analysis.quality.davies_bouldin_index));
        assert!((100..200).contains(&analysis.parameters.iterations));
        assert_eq!(analysis.parameters.distance_metric, "euclidean");
        assert!(analysis.id.starts_with("cluster-"));
    }

    #[test]
    fn test_same_seed_same_analysis() {
        let catalogs = Catalogs::default();
        let a = cluster_analysis(&mut StdRng::seed_from_u64(3), &catalogs, &ids(5), range(), now());
        let b = cluster_analysis(&mut StdRng::seed_from_u64(3), &catalogs, &ids(5), range(), now());
        assert_eq!(a, b);
    }
}
