//! Pagination and sorting parsed from raw HTTP query parameters.
//!
//! Parsing never fails: absent or unparseable values are treated as unset
//! and bad sort field names are rejected later, when the sort is applied.

use std::collections::HashMap;

/// Sort direction, ascending unless the caller asks otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Pagination window. `None` means "not requested".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

/// Requested sort. An unset name means upstream/natural order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    pub name: Option<String>,
    pub order: SortOrder,
}

/// Parsed listing query, shared by the video and recording listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub paging: Paging,
    pub sort: Sort,
}

impl Query {
    /// Parses raw string parameters. Recognized keys: `offset`, `limit`
    /// (non-negative integers), `sort`, `order` (`desc` or anything else
    /// meaning ascending). Unknown keys are ignored.
    pub fn parse(params: &HashMap<String, String>) -> Self {
        let offset = params.get("offset").and_then(|v| v.parse::<u32>().ok());
        let limit = params.get("limit").and_then(|v| v.parse::<u32>().ok());
        let name = params.get("sort").cloned();
        let order = match params.get("order").map(String::as_str) {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        };
        Self {
            paging: Paging { offset, limit },
            sort: Sort { name, order },
        }
    }

    /// Whether the requested sort keeps the upstream's own order, in which
    /// case no client-side sort is applied.
    pub fn is_natural_sort(&self, natural: &str) -> bool {
        match self.sort.name.as_deref() {
            None => true,
            Some(name) => name == natural,
        }
    }

    /// Upstream paging parameters. A zero offset or limit is omitted, the
    /// upstream treats the absent parameter as "from the start" / "all".
    pub fn paging_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(offset) = self.paging.offset {
            if offset > 0 {
                params.push(("StartIndex", offset.to_string()));
            }
        }
        if let Some(limit) = self.paging.limit {
            if limit > 0 {
                params.push(("Count", limit.to_string()));
            }
        }
        if self.sort.order == SortOrder::Desc {
            params.push(("Descending", "true".to_string()));
        }
        params
    }
}
