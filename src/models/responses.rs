//! Response DTOs for the registry API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use uuid::Uuid;

use crate::cache::CacheStats;
use crate::registry::CascadeReport;
use crate::stores::BulkInsertReport;

/// A full listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}

/// One page of a filtered listing.
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    /// Number of matches before paging
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl<T: Clone> PageResponse<T> {
    /// Cuts page `page` (1-based) out of `matches`.
    pub fn paginate(matches: &[T], page: usize, per_page: usize) -> Self {
        let start = (page - 1).saturating_mul(per_page);
        let items = matches
            .iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect();
        Self {
            items,
            total: matches.len(),
            page,
            per_page,
        }
    }
}

/// Response body for state and city updates
#[derive(Debug, Clone, Serialize)]
pub struct UpdateResponse {
    pub message: String,
    /// Records changed by the update
    pub modified: u64,
}

impl UpdateResponse {
    pub fn new(target: impl AsRef<str>, modified: u64) -> Self {
        Self {
            message: format!("'{}' updated", target.as_ref()),
            modified,
        }
    }
}

/// Response body for deletes, including cascaded children
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub deleted: CascadeReport,
}

impl DeleteResponse {
    pub fn new(target: impl AsRef<str>, deleted: CascadeReport) -> Self {
        Self {
            message: format!("'{}' deleted successfully", target.as_ref()),
            deleted,
        }
    }
}

/// Response body for bulk inserts
#[derive(Debug, Clone, Serialize)]
pub struct BulkInsertResponse {
    pub inserted: usize,
    pub skipped: usize,
    pub ids: Vec<Uuid>,
}

impl From<BulkInsertReport> for BulkInsertResponse {
    fn from(report: BulkInsertReport) -> Self {
        Self {
            inserted: report.inserted(),
            skipped: report.skipped,
            ids: report.ids,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// hits / (hits + misses)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            invalidations: stats.invalidations,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for GET /endpoints
#[derive(Debug, Clone, Serialize)]
pub struct EndpointsResponse {
    pub endpoints: Vec<String>,
}
