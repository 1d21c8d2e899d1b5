use chrono::NaiveDateTime;

use super::{Category, CategoryType};
use crate::sync::SyncStatus;

/// Name of the fallback category for unmatched transactions.
pub const UNCATEGORISED: &str = "Uncategorised";

struct DefaultCategory {
    name: &'static str,
    icon: &'static str,
    color: &'static str,
    category_type: CategoryType,
    keywords: &'static [&'static str],
    sort_order: i32,
}

const DEFAULT_CATEGORIES: &[DefaultCategory] = &[
    DefaultCategory { name: "Groceries", icon: "shopping-cart", color: "#22c55e", category_type: CategoryType::Expense, keywords: &["woolworths", "coles", "aldi", "iga", "costco", "harris farm", "fruit", "grocer"], sort_order: 1 },
    DefaultCategory { name: "Dining & Takeaway", icon: "utensils", color: "#f97316", category_type: CategoryType::Expense, keywords: &["uber eats", "doordash", "menulog", "mcdonald", "kfc", "subway", "cafe", "coffee", "restaurant", "pizza", "sushi", "nando", "guzman", "zambrero", "grill"], sort_order: 2 },
    DefaultCategory { name: "Transport", icon: "car", color: "#3b82f6", category_type: CategoryType::Expense, keywords: &["uber", "didi", "ola", "opal", "petrol", "ampol", "bp ", "caltex", "7-eleven fuel", "shell", "metro", "parking", "toll", "linkt"], sort_order: 3 },
    DefaultCategory { name: "Rent / Mortgage", icon: "home", color: "#8b5cf6", category_type: CategoryType::Expense, keywords: &["rent", "mortgage", "realestate", "ray white", "harcourts", "domain", "loan repay"], sort_order: 4 },
    DefaultCategory { name: "Utilities", icon: "zap", color: "#eab308", category_type: CategoryType::Expense, keywords: &["agl", "origin", "energy australia", "sydney water", "telstra", "optus", "vodafone", "nbn", "electricity", "gas bill", "water bill"], sort_order: 5 },
    DefaultCategory { name: "Subscriptions", icon: "repeat", color: "#06b6d4", category_type: CategoryType::Expense, keywords: &["netflix", "spotify", "apple.com", "google storage", "amazon prime", "disney", "youtube", "stan", "binge", "kayo", "chatgpt", "openai", "icloud", "adobe"], sort_order: 6 },
    DefaultCategory { name: "Health & Fitness", icon: "heart-pulse", color: "#ef4444", category_type: CategoryType::Expense, keywords: &["pharmacy", "chemist", "priceline", "anytime fitness", "gym", "f45", "doctor", "medical", "dental", "physio", "medicare"], sort_order: 7 },
    DefaultCategory { name: "Shopping", icon: "shopping-bag", color: "#ec4899", category_type: CategoryType::Expense, keywords: &["kmart", "target", "big w", "bunnings", "ikea", "amazon", "ebay", "jb hi", "officeworks", "harvey norman", "the iconic", "asos"], sort_order: 8 },
    DefaultCategory { name: "Entertainment", icon: "gamepad-2", color: "#a855f7", category_type: CategoryType::Expense, keywords: &["event cinema", "hoyts", "ticketek", "steam", "playstation", "xbox", "nintendo", "village", "bowling", "laser"], sort_order: 9 },
    DefaultCategory { name: "Insurance", icon: "shield", color: "#64748b", category_type: CategoryType::Expense, keywords: &["nrma", "allianz", "medibank", "bupa", "hcf", "ahi", "insurance", "youi", "budget direct", "suncorp"], sort_order: 10 },
    DefaultCategory { name: "Education", icon: "graduation-cap", color: "#0ea5e9", category_type: CategoryType::Expense, keywords: &["university", "tafe", "udemy", "coursera", "skillshare", "school", "hecs", "student"], sort_order: 11 },
    DefaultCategory { name: "Personal Care", icon: "scissors", color: "#f472b6", category_type: CategoryType::Expense, keywords: &["barber", "hairdresser", "beauty", "salon", "spa", "nail"], sort_order: 12 },
    DefaultCategory { name: "Fees & Charges", icon: "landmark", color: "#94a3b8", category_type: CategoryType::Expense, keywords: &["bank fee", "atm fee", "account fee", "international fee", "overdraft", "late fee", "annual fee"], sort_order: 13 },
    DefaultCategory { name: "Travel", icon: "plane", color: "#14b8a6", category_type: CategoryType::Expense, keywords: &["booking.com", "airbnb", "qantas", "jetstar", "virgin australia", "hotels", "expedia", "webjet", "flight"], sort_order: 14 },
    DefaultCategory { name: "Gifts & Donations", icon: "gift", color: "#f43f5e", category_type: CategoryType::Expense, keywords: &["gift", "donation", "charity", "gofundme", "present"], sort_order: 15 },
    DefaultCategory { name: "Alcohol & Bars", icon: "wine", color: "#b45309", category_type: CategoryType::Expense, keywords: &["liquorland", "dan murphy", "bws", "bar", "pub", "brewery", "wine", "bottle shop"], sort_order: 16 },
    DefaultCategory { name: UNCATEGORISED, icon: "help-circle", color: "#6b7280", category_type: CategoryType::Expense, keywords: &[], sort_order: 99 },
    DefaultCategory { name: "Salary", icon: "banknote", color: "#22c55e", category_type: CategoryType::Income, keywords: &["salary", "wages", "pay", "payroll"], sort_order: 1 },
    DefaultCategory { name: "Freelance", icon: "laptop", color: "#3b82f6", category_type: CategoryType::Income, keywords: &["invoice", "consulting", "freelance", "contract"], sort_order: 2 },
    DefaultCategory { name: "Interest", icon: "trending-up", color: "#14b8a6", category_type: CategoryType::Income, keywords: &["interest earned", "interest credit", "bonus interest"], sort_order: 3 },
    DefaultCategory { name: "Refund", icon: "rotate-ccw", color: "#f97316", category_type: CategoryType::Income, keywords: &["refund", "reversal", "cashback", "rebate"], sort_order: 4 },
    DefaultCategory { name: "Transfer In", icon: "arrow-down-left", color: "#8b5cf6", category_type: CategoryType::Income, keywords: &["transfer from", "bpay credit", "direct credit"], sort_order: 5 },
    DefaultCategory { name: "Other Income", icon: "plus-circle", color: "#06b6d4", category_type: CategoryType::Income, keywords: &["dividend", "rental income", "centrelink", "government"], sort_order: 6 },
    DefaultCategory { name: "Transfer", icon: "arrow-right-left", color: "#6b7280", category_type: CategoryType::Transfer, keywords: &["transfer to", "transfer between", "internal transfer"], sort_order: 1 },
];

/// Categories seeded into an empty database. Rows are `pending` so they are
/// pushed once a user signs in.
pub fn default_categories(now: NaiveDateTime) -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .map(|seed| Category {
            id: 0,
            name: seed.name.to_string(),
            icon: seed.icon.to_string(),
            color: seed.color.to_string(),
            category_type: seed.category_type,
            parent_id: None,
            keywords: seed.keywords.iter().map(|k| k.to_string()).collect(),
            budget: None,
            is_default: true,
            sort_order: seed.sort_order,
            remote_id: None,
            sync_status: SyncStatus::Seeded,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_contains_uncategorised_fallback() {
        let now = chrono::Utc::now().naive_utc();
        let categories = default_categories(now);
        assert_eq!(categories.len(), DEFAULT_CATEGORIES.len());
        let fallback = categories
            .iter()
            .find(|c| c.name == UNCATEGORISED)
            .expect("uncategorised present");
        assert!(fallback.keywords.is_empty());
        assert!(categories.iter().all(|c| c.sync_status == SyncStatus::Seeded));
    }
}
