//! Naming vocabulary and the built-in module catalog

/// Separates the module segment from the action in a permission key
pub const MODULE_SEPARATOR: char = '.';

/// Action substrings that mark a permission as read-only
pub const VIEW_MARKERS: &[&str] = &["read", "view"];

/// Action substrings that mark a permission as mutating
pub const MANAGE_VERBS: &[&str] = &[
    "create", "update", "delete", "publish", "refund", "cancel", "capture", "upload",
    "moderate", "adjust", "write", "invite", "preview", "generate", "confirm", "allocate",
    "manage", "approve", "issue", "void", "assign", "transfer", "recalculate", "complete",
];

/// LMDB map size used when none is configured (1 GiB)
pub const DEFAULT_MAP_SIZE: usize = 1 << 30;

// (module_key, label, view, manage, admin)
pub(crate) type CatalogRow = (&'static str, &'static str, &'static [&'static str], &'static [&'static str], &'static [&'static str]);

pub(crate) const BUILTIN_CATALOG: &[CatalogRow] = &[
    (
        "products", "Products",
        &["products.read"],
        &["products.create", "products.update", "products.publish"],
        &["products.delete"],
    ),
    (
        "attributes", "Attributes",
        &["attributes.read"],
        &["attributes.manage"],
        &[],
    ),
    (
        "orders", "Orders",
        &["orders.read"],
        &["orders.create", "orders.update", "orders.confirm", "orders.complete"],
        &["orders.cancel", "orders.refund", "orders.delete"],
    ),
    (
        "payments", "Payments",
        &["payments.read"],
        &["payments.capture"],
        &["payments.refund", "payments.void"],
    ),
    (
        "carts", "Carts",
        &["carts.read"],
        &["carts.update", "carts.recalculate"],
        &["carts.delete"],
    ),
    (
        "customers", "Customers",
        &["customers.read"],
        &["customers.create", "customers.update"],
        &["customers.delete"],
    ),
    (
        "inventory", "Inventory",
        &["inventory.read", "inventory.transfers.read"],
        &["inventory.adjust", "inventory.allocate", "inventory.transfers.create"],
        &["inventory.transfers.delete"],
    ),
    (
        "billing", "Billing",
        &["billing.read", "billing.invoices.read"],
        &["billing.invoices.issue", "billing.update"],
        &["billing.invoices.void"],
    ),
    (
        "storefront", "Storefront",
        &["storefront.read"],
        &["storefront.update", "storefront.preview", "storefront.upload"],
        &["storefront.publish"],
    ),
    (
        "reviews", "Reviews",
        &["reviews.read"],
        &["reviews.moderate"],
        &["reviews.delete"],
    ),
    (
        "team", "Team & Roles",
        &["team.read", "roles.read"],
        &["team.invite", "team.update"],
        &["roles.manage", "roles.assign", "team.delete"],
    ),
];
