macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

/// Unversioned operational endpoints.
pub mod ops {
    pub const PING: &str = "/ping";
    pub const HEALTH: &str = "/health";
}

/// Versioned API route definitions shared by the server and its tests
pub mod v1 {
    pub const ROOT: &str = "/api/v1";
    pub const VERSION: &str = "v1";

    pub mod items {
        pub const SEARCH: &str = v1_path!("/items/search");
        pub const ITEM: &str = v1_path!("/items/{item_id}");
    }

    pub mod products {
        pub const COLLECTION: &str = v1_path!("/products");
        pub const ITEM: &str = v1_path!("/products/{product_id}");
    }

    pub mod reviews {
        pub const FOR_ITEM: &str = v1_path!("/reviews/{item_id}");
        pub const SINGLE: &str = v1_path!("/reviews/single/{review_id}");
    }
}

pub mod utils {
    /// Substitute `{name}` placeholders in a route template.
    pub fn replace_param(
        template: &str,
        name: &str,
        value: impl std::fmt::Display,
    ) -> String {
        template.replace(&format!("{{{name}}}"), &value.to_string())
    }

    /// Strip the version prefix so a full path can be mounted under a
    /// nested router.
    pub fn relative(path: &'static str) -> &'static str {
        path.strip_prefix(super::v1::ROOT).unwrap_or(path)
    }
}
