use cetane::prelude::*;

pub fn migration() -> Migration {
    Migration::new("0002_ad_lookup_indexes")
        .depends_on(&["0001_initial_schema"])
        .operation(AddIndex::new(
            "scraped_ads",
            Index::new("idx_scraped_ads_ad_id").column("ad_id"),
        ))
        .operation(AddIndex::new(
            "scraped_ads",
            Index::new("idx_scraped_ads_platform").column("platform"),
        ))
}
