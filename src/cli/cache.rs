use super::ui;
use crate::core::cache::SeriesStore;
use crate::core::series::{SeriesCache, SeriesKind};
use anyhow::Result;
use comfy_table::Cell;

/// Renders what each series cache currently holds.
pub fn display_caches(caches: &[(SeriesKind, SeriesCache)]) -> String {
    let mut table = ui::table_with_header(&["Series", "Count", "Years"]);

    for (kind, cache) in caches {
        let years = cache
            .iter()
            .map(|(year, _)| year)
            .collect::<Vec<_>>()
            .join(", ");
        let years_cell = if years.is_empty() {
            Cell::new(ui::subtle("empty"))
        } else {
            Cell::new(years)
        };
        table.add_row(vec![
            Cell::new(kind.label()),
            Cell::new(cache.len()),
            years_cell,
        ]);
    }
    table.to_string()
}

pub async fn run(store: &dyn SeriesStore) -> Result<()> {
    let mut caches = Vec::with_capacity(SeriesKind::ALL.len());
    for kind in SeriesKind::ALL {
        caches.push((kind, store.load(kind).await?));
    }
    println!("{}", display_caches(&caches));
    Ok(())
}
