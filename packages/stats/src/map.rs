//! Projection of region totals onto map identifiers.

use epi_dash_geography_models::RegionNameTable;
use epi_dash_stats_models::{MapEntry, MapPayload, RegionStatRow};

/// Turns region rows into a map payload using a fixed name table.
///
/// Regions the table cannot translate are left off the map. That is the
/// expected behaviour for datasets covering areas the boundary file does
/// not; their names are reported in [`MapPayload::dropped_regions`].
#[derive(Debug, Clone, Copy)]
pub struct MapProjector<'a> {
    table: &'a RegionNameTable,
}

impl<'a> MapProjector<'a> {
    /// Creates a projector backed by `table`.
    #[must_use]
    pub const fn new(table: &'a RegionNameTable) -> Self {
        Self { table }
    }

    /// Builds the map payload for `rows`, keeping their order.
    ///
    /// `max_cases` and `min_cases` cover only the entries that made it onto
    /// the map, and are both zero if none did.
    #[must_use]
    pub fn project(&self, rows: &[RegionStatRow]) -> MapPayload {
        let mut map_data = Vec::with_capacity(rows.len());
        let mut dropped_regions = Vec::new();

        for row in rows {
            let Some(external_id) = self.table.external_id(&row.region_name) else {
                dropped_regions.push(row.region_name.clone());
                continue;
            };
            map_data.push(MapEntry {
                external_id: external_id.to_owned(),
                local_name: row.region_name.clone(),
                cumulative_confirmed: row.cumulative_confirmed,
                incidence_rate: row.incidence_rate,
                active_cases: row.active_confirmed,
                population: row.population,
            });
        }

        if !dropped_regions.is_empty() {
            log::debug!(
                "No '{}' map identifier for {} region(s): {}",
                self.table.id(),
                dropped_regions.len(),
                dropped_regions.join(", ")
            );
        }

        let max_cases = map_data
            .iter()
            .map(|e| e.cumulative_confirmed)
            .max()
            .unwrap_or(0);
        let min_cases = map_data
            .iter()
            .map(|e| e.cumulative_confirmed)
            .min()
            .unwrap_or(0);

        MapPayload {
            map_data,
            max_cases,
            min_cases,
            dropped_regions,
        }
    }
}
