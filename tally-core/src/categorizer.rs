//! Deterministic keyword categorization.
//!
//! Rules are plain data: an ordered list of `(category, keywords)` pairs,
//! checked top to bottom against the lower-cased description. The priority
//! rules run before the domain table; the first keyword hit wins.

use crate::statement::Category;

/// One keyword rule
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
}

const fn rule(category: Category, keywords: &'static [&'static str]) -> CategoryRule {
    CategoryRule { category, keywords }
}

/// Checked first: money movement that is not an expense
pub const PRIORITY_RULES: &[CategoryRule] = &[
    rule(
        Category::Income,
        &["deposit", "transfer from", "zelle from", "payroll", "salary", "invoice", "credit"],
    ),
    rule(
        Category::BankFees,
        &["service fee", "maintenance fee", "bank fee", "overdraft", "nsf", "wire fee"],
    ),
    rule(
        Category::Transfers,
        &["transfer to", "zelle to", "payment to loan", "credit card payment", "online transfer"],
    ),
];

/// General expense table, checked after [`PRIORITY_RULES`]
pub const DOMAIN_RULES: &[CategoryRule] = &[
    rule(
        Category::AutoGas,
        &[
            "shell", "chevron", "exxon", "mobil", "bp", "texaco", "sunoco", "7-eleven",
            "circle k", "wawa", "gas", "fuel", "auto", "parking", "toll", "uber", "lyft",
        ],
    ),
    rule(
        Category::SoftwareTech,
        &[
            "adobe", "google", "aws", "amazon web", "digitalocean", "godaddy", "namecheap",
            "vercel", "supabase", "github", "gitlab", "jetbrains", "apple", "microsoft", "zoom",
            "slack", "intuit", "quickbooks", "xero",
        ],
    ),
    rule(
        Category::Marketing,
        &[
            "facebook", "meta", "instagram", "linkedin", "google ads", "ads", "marketing",
            "mailchimp", "hostinger",
        ],
    ),
    rule(
        Category::Contractors,
        &["upwork", "fiverr", "toptal", "consultant", "contractor"],
    ),
    rule(
        Category::MealsEntertainment,
        &[
            "restaurant", "cafe", "coffee", "starbucks", "dunkin", "mcdonalds", "burger", "pizza",
            "food", "grill", "bar", "sushi", "taco", "chipotle", "uber eats", "doordash",
        ],
    ),
    rule(
        Category::Travel,
        &[
            "hotel", "airbnb", "flight", "airline", "delta", "american air", "united", "spirit",
            "expedia", "booking.com", "marriott", "hilton",
        ],
    ),
    rule(
        Category::OfficeSupplies,
        &[
            "walmart", "target", "publix", "office depot", "staples", "amazon", "amzn",
            "best buy", "home depot", "lowes", "costco", "sams club",
        ],
    ),
    rule(
        Category::Utilities,
        &[
            "fpl", "water", "electric", "power", "utility", "comcast", "att", "verizon",
            "frontier", "t-mobile", "spectrum", "garbage", "waste",
        ],
    ),
    rule(
        Category::ProfessionalFees,
        &["attorney", "legal", "cpa", "accounting", "notary"],
    ),
    rule(
        Category::RentHoa,
        &[
            "rent", "lease", "storage", "public storage", "hampton", "community", "cvp",
            "vendor pay", "investments",
        ],
    ),
    rule(
        Category::Insurance,
        &["insurance", "state farm", "geico", "progressive", "allstate", "liberty mutual"],
    ),
    rule(
        Category::Taxes,
        &["irs", "us treasury", "tax", "department of revenue"],
    ),
];

/// How a keyword categorization was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryMatch {
    /// A table rule fired on this keyword
    Keyword(&'static str),
    /// No rule fired; the description mentions a check
    CheckFallback,
    /// Nothing matched
    Unmatched,
}

/// Categorization result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryResult {
    pub category: Category,
    pub matched: CategoryMatch,
}

/// Categorize a description using the keyword tables
pub fn categorize(description: &str) -> CategoryResult {
    let desc = description.to_lowercase();

    for r in PRIORITY_RULES.iter().chain(DOMAIN_RULES) {
        if let Some(k) = r.keywords.iter().find(|k| desc.contains(*k)) {
            return CategoryResult {
                category: r.category,
                matched: CategoryMatch::Keyword(*k),
            };
        }
    }

    if desc.contains("check") {
        return CategoryResult {
            category: Category::Checks,
            matched: CategoryMatch::CheckFallback,
        };
    }

    CategoryResult {
        category: Category::Uncategorized,
        matched: CategoryMatch::Unmatched,
    }
}
