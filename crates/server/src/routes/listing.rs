//! Name-listing shapes shared by the three collection endpoints: the
//! offset/limit query and the linked response body.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use store::Window;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    /// Default window is the first 20 entries; `limit=-1` means everything.
    pub fn window(&self) -> Window {
        Window::from_wire(self.offset.unwrap_or(0), self.limit.unwrap_or(20))
    }
}

#[derive(Debug, Serialize)]
pub struct Link {
    pub href: String,
}

pub type Links = BTreeMap<&'static str, Link>;

#[derive(Debug, Serialize)]
pub struct NamedEntry {
    pub name: String,
    #[serde(rename = "_links")]
    pub links: Links,
}

#[derive(Debug, Serialize)]
pub struct NameListing {
    pub names: Vec<NamedEntry>,
    #[serde(rename = "_links")]
    pub links: Links,
}

pub fn self_link(href: impl Into<String>) -> Links {
    BTreeMap::from([("self", Link { href: href.into() })])
}

/// Listing body: each name links to its entry resource, the collection to
/// itself.
pub fn name_listing(collection_href: &str, entry_href: &str, names: Vec<String>) -> NameListing {
    NameListing {
        names: names
            .into_iter()
            .map(|name| NamedEntry {
                links: self_link(format!("{}/{}", entry_href, name)),
                name,
            })
            .collect(),
        links: self_link(collection_href),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_defaults_and_sentinel() {
        assert_eq!(ListQuery::default().window(), Window::new(0, 20));
        let q = ListQuery { offset: Some(1), limit: Some(-1) };
        assert_eq!(q.window(), Window::unbounded(1));
    }

    #[test]
    fn listing_links_point_at_entries() {
        let body = name_listing("/v1/http/routers", "/v1/http/router", vec!["edge".into()]);
        assert_eq!(body.names[0].name, "edge");
        assert_eq!(body.names[0].links["self"].href, "/v1/http/router/edge");
        assert_eq!(body.links["self"].href, "/v1/http/routers");
    }
}
