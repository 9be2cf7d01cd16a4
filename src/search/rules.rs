use crate::catalog::Deal;

/// Phrase in the query that widens the match to deals satisfying a predicate
pub struct NaturalLanguageRule {
    pub trigger: &'static str,
    pub predicate: fn(&Deal) -> bool,
}

impl NaturalLanguageRule {
    /// `query` must already be lowercased
    pub fn fires(&self, query: &str, deal: &Deal) -> bool {
        query.contains(self.trigger) && (self.predicate)(deal)
    }
}

pub static NATURAL_LANGUAGE_RULES: &[NaturalLanguageRule] = &[
    NaturalLanguageRule { trigger: "discount", predicate: |d| d.discount_percentage > 20 },
    NaturalLanguageRule { trigger: "coupon", predicate: |d| d.coupon_code.is_some() },
    NaturalLanguageRule { trigger: "amazon", predicate: |d| d.merchant == "Amazon" },
    NaturalLanguageRule { trigger: "best buy", predicate: |d| d.merchant == "Best Buy" },
    NaturalLanguageRule { trigger: "walmart", predicate: |d| d.merchant == "Walmart" },
    NaturalLanguageRule { trigger: "hot deals", predicate: |d| d.is_hot },
    NaturalLanguageRule { trigger: "electronics", predicate: |d| d.category == "Electronics" },
    NaturalLanguageRule { trigger: "clothing", predicate: |d| d.category == "Clothing" },
    NaturalLanguageRule { trigger: "kitchen", predicate: |d| d.category == "Home & Kitchen" },
    NaturalLanguageRule { trigger: "beauty", predicate: |d| d.category == "Beauty & Personal Care" },
    NaturalLanguageRule { trigger: "gaming", predicate: |d| d.category == "Gaming" },
];

/// True if any rule in the table fires for this query and deal
pub fn any_rule_fires(query: &str, deal: &Deal) -> bool {
    NATURAL_LANGUAGE_RULES.iter().any(|rule| rule.fires(query, deal))
}
