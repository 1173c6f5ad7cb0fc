//! Schema migrations, applied in dependency order by cetane.

use cetane::prelude::*;

mod m0001_initial_schema;
mod m0002_ad_lookup_indexes;

/// All known migrations.
pub fn registry() -> MigrationRegistry {
    let mut registry = MigrationRegistry::new();
    registry.register(m0001_initial_schema::migration());
    registry.register(m0002_ad_lookup_indexes::migration());
    registry
}
