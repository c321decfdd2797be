use crate::types::{CatalogData, CatalogError, CatalogItem};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Built-in catalog used when no file is configured
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Read-only item lookup by exact name
///
/// The trade engine depends on this capability rather than on a concrete
/// catalog, so a database- or file-backed source can stand in for
/// [`ItemCatalog`].
pub trait CatalogLookup {
    /// Resolve an item by its exact, case-sensitive name
    fn lookup(&self, name: &str) -> Option<&CatalogItem>;
}

/// Item Catalog - Maps item names to their attributes
///
/// Entries are kept in load order; a name index gives O(1) lookups.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    /// Items in load order
    items: Vec<CatalogItem>,

    /// Map from item name to position in `items`
    index_by_name: HashMap<String, usize>,
}

impl ItemCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of items, validating every entry
    pub fn from_items(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        catalog.replace_items(items)?;
        Ok(catalog)
    }

    /// Catalog bundled with the crate
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse a catalog document
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::from_items(data.items)
    }

    /// Load catalog data from a JSON file
    pub async fn load_from_file<P: AsRef<Path>>(file_path: P) -> Result<Self, CatalogError> {
        info!("Loading item catalog from: {:?}", file_path.as_ref());

        let json_content = tokio::fs::read_to_string(&file_path).await?;
        let catalog = Self::from_json(&json_content)?;

        info!("Loaded {} items into catalog", catalog.len());
        Ok(catalog)
    }

    /// Replace the catalog contents, rejecting the whole batch on any bad entry
    fn replace_items(&mut self, items: Vec<CatalogItem>) -> Result<(), CatalogError> {
        let mut index_by_name = HashMap::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            item.validate()?;
            if index_by_name.insert(item.name.clone(), position).is_some() {
                return Err(CatalogError::DuplicateName(item.name.clone()));
            }
        }

        debug!("Indexed {} catalog entries", items.len());
        self.items = items;
        self.index_by_name = index_by_name;
        Ok(())
    }

    /// Get an item by exact name
    pub fn get_by_name(&self, name: &str) -> Result<&CatalogItem, CatalogError> {
        self.lookup(name).ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    /// All items in load order
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Top N items by standard value, highest first
    pub fn top_items(&self, limit: usize) -> Vec<&CatalogItem> {
        let mut ranked = rank_by_value(self.items.iter().collect());
        ranked.truncate(limit);
        ranked
    }

    /// Items currently in the shop rotation
    pub fn in_stock(&self) -> Vec<&CatalogItem> {
        self.items.iter().filter(|item| item.in_stock).collect()
    }

    /// Search for items by case-insensitive partial name match, highest standard value first
    pub fn search_items(&self, query: &str) -> Vec<&CatalogItem> {
        let query_lower = query.to_lowercase();
        rank_by_value(
            self.items
                .iter()
                .filter(|item| item.name.to_lowercase().contains(&query_lower))
                .collect(),
        )
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CatalogLookup for ItemCatalog {
    fn lookup(&self, name: &str) -> Option<&CatalogItem> {
        self.index_by_name.get(name).map(|&position| &self.items[position])
    }
}

impl<T: CatalogLookup + ?Sized> CatalogLookup for &T {
    fn lookup(&self, name: &str) -> Option<&CatalogItem> {
        (**self).lookup(name)
    }
}

impl<T: CatalogLookup + ?Sized> CatalogLookup for std::sync::Arc<T> {
    fn lookup(&self, name: &str) -> Option<&CatalogItem> {
        (**self).lookup(name)
    }
}

impl CatalogLookup for HashMap<String, CatalogItem> {
    fn lookup(&self, name: &str) -> Option<&CatalogItem> {
        self.get(name)
    }
}

fn rank_by_value(mut items: Vec<&CatalogItem>) -> Vec<&CatalogItem> {
    items.sort_by(|a, b| b.standard_value.cmp(&a.standard_value).then(a.name.cmp(&b.name)));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rarity;
    use std::io::Write;

    fn create_test_items() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("West Dragon", 1_000_000_000, 2_300_000_000)
                .with_rarity(Rarity::Mythical)
                .with_demand(10),
            CatalogItem::new("Kitsune", 215_000_000, 1_800_000_000).with_rarity(Rarity::Mythical),
            CatalogItem::new("Dragon Talon", 3_000_000, 90_000_000).with_rarity(Rarity::Rare),
        ]
    }

    #[test]
    fn test_catalog_creation() {
        let catalog = ItemCatalog::from_items(create_test_items()).unwrap();

        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_lookup_is_exact() {
        let catalog = ItemCatalog::from_items(create_test_items()).unwrap();

        let kitsune = catalog.lookup("Kitsune").unwrap();
        assert_eq!(kitsune.permanent_value, 1_800_000_000);

        // Keys are case-sensitive
        assert!(catalog.lookup("kitsune").is_none());
        assert!(matches!(catalog.get_by_name("Leopard"), Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut items = create_test_items();
        items.push(CatalogItem::new("Kitsune", 1, 1));

        let err = ItemCatalog::from_items(items).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName(name) if name == "Kitsune"));
    }

    #[test]
    fn test_search_items() {
        let catalog = ItemCatalog::from_items(create_test_items()).unwrap();

        let results = catalog.search_items("dragon");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "West Dragon");
        assert_eq!(results[1].name, "Dragon Talon");

        let results = catalog.search_items("KIT");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Kitsune");
    }

    #[test]
    fn test_top_items() {
        let catalog = ItemCatalog::from_items(create_test_items()).unwrap();

        let top = catalog.top_items(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "West Dragon");
        assert_eq!(top[1].name, "Kitsune");
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = ItemCatalog::builtin().unwrap();

        assert!(catalog.len() >= 40);
        let dragon = catalog.lookup("West Dragon").unwrap();
        assert_eq!(dragon.standard_value, 1_000_000_000);
        assert_eq!(dragon.permanent_value, 2_300_000_000);
        assert!(!catalog.in_stock().is_empty());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let data = CatalogData { items: create_test_items() };
        write!(file, "{}", serde_json::to_string(&data).unwrap()).unwrap();

        let catalog = ItemCatalog::load_from_file(file.path()).await.unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.lookup("Dragon Talon").is_some());
    }

    #[tokio::test]
    async fn test_load_from_missing_file() {
        let result = ItemCatalog::load_from_file("does/not/exist.json").await;
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
