use std::collections::HashMap;

use crate::core::record::{BeerRecord, BreweryRecord};
use crate::core::types::RecordId;

use super::store::Catalog;

/// Distinct normalized brewery names of a catalog, in first-seen order.
///
/// Several source breweries can normalize to the same name; they are scored
/// once and their beers are pooled when that name wins.
#[derive(Debug, Default)]
pub struct BreweryIndex {
    names: Vec<String>,
    name_to_breweries: HashMap<String, Vec<usize>>,
}

impl BreweryIndex {
    pub fn build(catalog: &Catalog) -> Self {
        let mut index = Self::default();
        for (idx, brewery) in catalog.breweries.iter().enumerate() {
            let positions = index
                .name_to_breweries
                .entry(brewery.name.clone())
                .or_default();
            if positions.is_empty() {
                index.names.push(brewery.name.clone());
            }
            positions.push(idx);
        }
        index
    }

    /// Distinct names, in the order their first brewery appears
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Catalog positions of every brewery with this normalized name
    pub fn positions(&self, name: &str) -> &[usize] {
        self.name_to_breweries
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Beers of every brewery with this normalized name, in catalog order
    pub fn beers_of<'c>(
        &'c self,
        catalog: &'c Catalog,
        name: &str,
    ) -> impl Iterator<Item = &'c BeerRecord> + 'c {
        self.positions(name)
            .iter()
            .flat_map(move |&idx| catalog.breweries[idx].beers.iter())
    }

    /// First brewery with this normalized name that lists `beer`
    pub fn owner_of<'c>(
        &self,
        catalog: &'c Catalog,
        name: &str,
        beer: &RecordId,
    ) -> Option<&'c BreweryRecord> {
        self.positions(name)
            .iter()
            .map(|&idx| &catalog.breweries[idx])
            .find(|brewery| brewery.has_beer(beer))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_names_in_first_seen_order() {
        let catalog = Catalog::from_breweries([
            BreweryRecord::new("1", "Bell's Brewery").with_beer("10", "Oberon"),
            BreweryRecord::new("2", "Founders Brewing"),
            BreweryRecord::new("3", "Bells Brewery Inc").with_beer("30", "Two Hearted Ale"),
        ]);
        let index = BreweryIndex::build(&catalog);

        assert_eq!(index.names(), ["bells".to_string(), "founders".to_string()]);
        assert_eq!(index.positions("bells"), [0, 2]);
        assert!(index.positions("unknown").is_empty());

        let beers: Vec<_> = index.beers_of(&catalog, "bells").map(|b| b.name.as_str()).collect();
        assert_eq!(beers, vec!["oberon", "two hearted ale"]);

        let owner = index.owner_of(&catalog, "bells", &RecordId::new("30")).unwrap();
        assert_eq!(owner.id, RecordId::new("3"));
        assert!(index.owner_of(&catalog, "founders", &RecordId::new("30")).is_none());
    }

    #[test]
    fn test_empty_catalog() {
        let index = BreweryIndex::build(&Catalog::new());
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }
}
