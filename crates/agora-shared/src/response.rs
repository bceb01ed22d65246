//! Response envelopes: paginated lists and RFC 7807 errors.

use serde::{Deserialize, Serialize};

use crate::dto::Page;

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub object: String,
    pub has_more: bool,
    pub page: usize,
    pub page_count: usize,
    /// Items across all pages.
    pub item_count: usize,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, page: Page, item_count: usize) -> Self {
        let page_count = item_count.div_ceil(page.limit.max(1));
        Self {
            object: "list".to_string(),
            has_more: page.number < page_count,
            page: page.number,
            page_count,
            item_count,
            data,
        }
    }
}

/// RFC 7807 Problem Details for HTTP APIs.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(401, "Unauthorized").with_detail(detail)
    }

    pub fn forbidden(detail: impl Into<String>) -> Self {
        Self::new(403, "Forbidden").with_detail(detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(404, "Not Found").with_detail(detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(409, "Conflict").with_detail(detail)
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_envelope() {
        let page = Page {
            number: 2,
            limit: 10,
        };
        let list = ListResponse::new(vec![1, 2, 3], page, 23);

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(json["object"], "list");
        assert_eq!(json["hasMore"], true);
        assert_eq!(json["pageCount"], 3);
        assert_eq!(json["itemCount"], 23);
    }

    #[test]
    fn test_last_page_has_no_more() {
        let page = Page {
            number: 3,
            limit: 10,
        };

        assert!(!ListResponse::new(vec![()], page, 21).has_more);
    }

    #[test]
    fn test_problem_document_shape() {
        let json = serde_json::to_value(ErrorResponse::not_found("post not found")).unwrap();

        assert_eq!(json["type"], "about:blank");
        assert_eq!(json["status"], 404);
        assert_eq!(json["detail"], "post not found");
    }
}
