// src/enrich.rs
//
// Derived columns over scraped companies plus a small k-means grouping.

use crate::core::email::is_role_address;
use crate::model::{Company, COMPANY_COLUMNS};
use crate::store::DataSet;

pub const ENRICH_COLUMNS: [&str; 6] = [
    "Has Email",
    "Role Address",
    "Profile URL Length",
    "Phone Length",
    "Location Length",
    "Cluster",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Features {
    pub has_email: bool,
    /// Primary email is a shared mailbox.
    pub role_address: bool,
    pub url_len: usize,
    pub phone_len: usize,
    pub location_len: usize,
}

impl Features {
    pub fn of(c: &Company) -> Self {
        Self {
            has_email: c.has_email(),
            role_address: c.primary_email().is_some_and(is_role_address),
            url_len: c.profile_url.chars().count(),
            phone_len: c.phone.chars().count(),
            location_len: c.location.chars().count(),
        }
    }

    /// Clustering input.
    pub fn point(&self) -> Vec<f64> {
        vec![self.url_len as f64, self.phone_len as f64, self.location_len as f64]
    }
}

fn dist2(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn nearest(p: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = dist2(p, c);
        if d < best_d {
            best = i;
            best_d = d;
        }
    }
    best
}

/// Lloyd's k-means. Seeds are the first `k` distinct points, so the result is
/// deterministic. Returns one cluster index per point.
pub fn kmeans(points: &[Vec<f64>], k: usize, max_iter: usize) -> Vec<usize> {
    if k == 0 || points.is_empty() {
        return Vec::new();
    }

    let mut centroids: Vec<Vec<f64>> = Vec::with_capacity(k);
    for p in points {
        if !centroids.contains(p) {
            centroids.push(p.clone());
            if centroids.len() == k {
                break;
            }
        }
    }

    let dims = points[0].len();
    let mut assign = vec![usize::MAX; points.len()];
    for _ in 0..max_iter.max(1) {
        let mut changed = false;
        for (i, p) in points.iter().enumerate() {
            let c = nearest(p, &centroids);
            if assign[i] != c {
                assign[i] = c;
                changed = true;
            }
        }
        if !changed {
            break;
        }

        let mut sums = vec![vec![0.0; dims]; centroids.len()];
        let mut counts = vec![0usize; centroids.len()];
        for (p, &c) in points.iter().zip(&assign) {
            counts[c] += 1;
            for (s, v) in sums[c].iter_mut().zip(p) {
                *s += v;
            }
        }
        for (c, (sum, n)) in sums.into_iter().zip(counts).enumerate() {
            if n > 0 {
                centroids[c] = sum.into_iter().map(|s| s / n as f64).collect();
            }
        }
    }
    assign
}

fn yes_no(b: bool) -> String {
    s!(if b { "yes" } else { "no" })
}

/// Company columns followed by `ENRICH_COLUMNS`.
pub fn enrich_dataset(companies: &[Company], k: usize) -> DataSet {
    let features: Vec<Features> = companies.iter().map(Features::of).collect();
    let points: Vec<Vec<f64>> = features.iter().map(Features::point).collect();
    let clusters = kmeans(&points, k, crate::config::consts::KMEANS_MAX_ITER);
    logd!("Enrich: {} record(s), k={k}", companies.len());

    let mut headers: Vec<String> = COMPANY_COLUMNS.iter().map(|s| s!(*s)).collect();
    headers.extend(ENRICH_COLUMNS.iter().map(|s| s!(*s)));

    let rows = companies
        .iter()
        .zip(&features)
        .enumerate()
        .map(|(i, (c, f))| {
            let mut row = c.to_row();
            row.push(yes_no(f.has_email));
            row.push(yes_no(f.role_address));
            row.push(f.url_len.to_string());
            row.push(f.phone_len.to_string());
            row.push(f.location_len.to_string());
            row.push(clusters.get(i).map(|c| c.to_string()).unwrap_or_default());
            row
        })
        .collect();

    DataSet { headers: Some(headers), rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_obvious_groups() {
        let pts = vec![
            vec![0.0, 0.0],
            vec![10.0, 10.0],
            vec![0.5, 0.0],
            vec![10.0, 9.5],
            vec![0.0, 0.5],
        ];
        assert_eq!(kmeans(&pts, 2, 50), vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(kmeans(&[], 3, 10).is_empty());
        assert!(kmeans(&[vec![1.0]], 0, 10).is_empty());
        // k clamped to the number of distinct points
        let same = vec![vec![2.0], vec![2.0], vec![2.0]];
        assert_eq!(kmeans(&same, 4, 10), vec![0, 0, 0]);
    }

    #[test]
    fn features_flag_role_primary() {
        let c = Company {
            emails: strings!["info@acme.de", "jane@acme.de"],
            phone: s!("+49 1"),
            profile_url: s!("https://x/p"),
            ..Company::default()
        };
        let f = Features::of(&c);
        assert!(f.has_email && f.role_address);
        assert_eq!(f.phone_len, 5);
        assert_eq!(f.location_len, 0);
    }

    #[test]
    fn enriched_rows_extend_company_rows() {
        let c = Company { name: s!("A"), profile_url: s!("u"), ..Company::default() };
        let ds = enrich_dataset(&[c.clone(), c], 4);
        assert_eq!(ds.header_count(), 12);
        assert_eq!(ds.rows[0][6], "no");
        assert_eq!(ds.rows[0][11], "0");
        assert_eq!(ds.rows[1][11], "0");
    }
}
