//! Scenario categories and their brief patterns.
//!
//! Patterns use `{name}` placeholders filled by [`render`]. Money
//! placeholders render with a dollar sign and thousands separators.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A class of client situation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioCategory {
    /// A single stated goal.
    Goal,
    /// A single difficulty plus current savings.
    Challenge,
    /// A question about one financial product.
    Product,
    /// Several competing goals, savings and debt.
    Complex,
    /// Market-specific flagship situations (relocation, tier progression,
    /// ESG transition, business exit, equity compensation, education,
    /// repatriation, legacy, alternatives, family governance).
    Market,
}

impl ScenarioCategory {
    /// All categories, in weight-table order.
    pub const ALL: [ScenarioCategory; 5] = [
        Self::Goal,
        Self::Challenge,
        Self::Product,
        Self::Complex,
        Self::Market,
    ];

    /// Lowercase key used in configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Goal => "goal",
            Self::Challenge => "challenge",
            Self::Product => "product",
            Self::Complex => "complex",
            Self::Market => "market",
        }
    }

    /// Brief patterns for this category.
    pub fn patterns(self) -> &'static [&'static str] {
        match self {
            Self::Goal => GOAL_PATTERNS,
            Self::Challenge => CHALLENGE_PATTERNS,
            Self::Product => PRODUCT_PATTERNS,
            Self::Complex => COMPLEX_PATTERNS,
            Self::Market => MARKET_PATTERNS,
        }
    }
}

impl fmt::Display for ScenarioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const GOAL_PATTERNS: &[&str] = &[
    "{age}-year-old {family}, {income} annual income. Wants to {goal}.",
    "{age} years old, {family}, earning {income} annually. Goal: {goal}.",
    "{age}-year-old {family} making {income}/year. Looking to {goal}.",
];

const CHALLENGE_PATTERNS: &[&str] = &[
    "{age}-year-old {family}, {income} annual income, {assets} in savings. Struggling with {challenge}.",
    "{age} years old, {family}, {income}/year. Challenge: {challenge}. {assets} saved.",
    "{age}-year-old {family} earning {income} with {assets} saved. Difficulty with {challenge}.",
];

const PRODUCT_PATTERNS: &[&str] = &[
    "{age}-year-old {family}, {income} income. Confused about {product}. Needs simple explanation.",
    "{age} years old, {family}, earning {income}. Considering {product} to {goal}. Explain benefits.",
    "{age}-year-old {family} making {income}. Heard about {product}, wants it demystified.",
];

const COMPLEX_PATTERNS: &[&str] = &[
    "{age}-year-old {family}, {income} annual income, {assets} in savings. Recently paused retirement contributions due to {challenge}. Needs to rebuild confidence and refocus on long-term goals without adding financial strain.",
    "{age} years old, {family}, {income} income, {assets} saved, {debt} in debt. Wants to {goal} while dealing with {challenge}. Feeling overwhelmed.",
    "{age}-year-old {family} earning {income}, {assets} saved. Challenge: {challenge}. Goal: {goal}. Needs help prioritizing and balancing everything.",
];

const MARKET_PATTERNS: &[&str] = &[
    // Cross-border
    "{age}-year-old {family} moving from Hong Kong to Singapore, {income} income, {assets} in assets. Needs help with cross-border wealth transfer, tax implications, and setting up banking in the new jurisdiction.",
    "{age} years old, {family}, managing wealth across GBP, HKD and SGD. {income} annual income, {assets} portfolio. Looking to optimize currency exposure and reduce FX risk.",
    "{age}-year-old {family}, {income} income. Participating in Greater Bay Area Wealth Connect. Wants to understand investment limits, eligible products, and cross-border tax treatment.",
    // Tier progression
    "{age} years old, {family}, currently Premier with {assets} in assets and {income} annual income. Close to the Jade threshold and wants a strategy to get there and access alternative investments.",
    "{age}-year-old {family}, Jade client with {assets}, {income} income. Considering a move to Private Banking. Wants to know which services and opportunities open up at that level.",
    // Sustainable investing
    "{age}-year-old {family}, {income} income, {assets} portfolio. Wants to transition the entire portfolio to ESG-aligned investments. Concerned about greenwashing and measuring real impact.",
    "{age} years old, {family}, {income} annual income. Interested in SDG-aligned emerging market bonds and climate solutions funds. Needs education on sustainable options and performance expectations.",
    "{age}-year-old {family} with {assets} portfolio. Wants a donor-advised fund for systematic philanthropy while keeping an ESG investment approach. Looking for a tax-efficient structure.",
    // Business owners
    "{age}-year-old entrepreneur, {family}, preparing to sell the family business. Expecting a {exit_value} liquidity event within 12 months. Needs tax planning, investment strategy, and a wealth structure before exit.",
    "{age} years old, {family}, serial entrepreneur with {income} annual income but lumpy. {assets} saved. Needs a strategy to smooth income, separate business risk from family wealth, and plan the next venture.",
    "{age}-year-old family business owner, second generation, {income} income. Managing succession planning with three siblings. Needs a governance structure and fair distribution strategy.",
    // Equity compensation
    "{age}-year-old tech professional, {family}, {income} base salary plus {rsu} in RSUs vesting annually. 60% of net worth concentrated in employer stock. Needs a diversification strategy and tax planning.",
    "{age} years old, startup founder post-Series B, {family}. Sitting on {assets} in illiquid equity, {income} salary. ISO exercise deadline approaching and needs to weigh tax implications and liquidity options.",
    // Education
    "{age}-year-old expat couple, {family}, {income} income. Two children heading to US/UK universities in 2-4 years. Needs an international education funding strategy accounting for currency risk and tax.",
    "{age} years old, {family}, {income} annual income, {assets} saved. Grandchildren attending international schools in three different countries. Wants education trusts with cross-border efficiency.",
    // Repatriation and relocation
    "{age}-year-old {family}, returning to mainland China after 15 years in Singapore. {income} income, {assets} in assets. Needs a repatriation strategy, clarity on investment restrictions, and an optimized tax position.",
    "{age} years old, {family}, relocating from London to Dubai for career. {income} income, {assets} portfolio. Needs to understand the UAE wealth landscape and tax advantages while keeping UK property investments.",
    // Retirement and legacy
    "{age}-year-old {family}, {income} pension income, {assets} portfolio. Properties in Hong Kong and Vancouver. Needs a cross-border estate plan to minimize taxes and ensure smooth transfer to children in different countries.",
    "{age} years old, {family}, recently retired with {assets} portfolio generating {income} annually. Concerned about sequence of returns risk and making the portfolio last 30+ years across multiple currencies.",
    // Alternatives
    "{age}-year-old Jade client, {family}, {income} income, {assets} portfolio currently 80% public equities. Wants exposure to private equity and alternatives. Needs education on illiquidity, fees, and allocation.",
    "{age} years old, UHNW client, {family}, {income} annual income, {assets} AUM. Interested in art financing and collectibles. Wants to understand lending ratios and how they fit the overall wealth strategy.",
    // Multi-generational wealth
    "{age}-year-old {family}, managing {assets} of multi-generational family wealth. Three adult children with different risk tolerances and ESG preferences. Needs a family governance framework and customized sub-portfolios.",
    "{age} years old, {family}, inherited {assets} from parents. {income} own income. The next generation demands 100% sustainable investing while preserving family wealth. Needs a transition strategy.",
];

/// Values substituted into a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriefParams {
    /// Client age.
    pub age: u32,
    /// Annual income, dollars.
    pub income: u64,
    /// Investable assets or savings, dollars.
    pub assets: u64,
    /// Outstanding debt, dollars.
    pub debt: u64,
    /// Family or life situation.
    pub family: &'static str,
    /// Client goal.
    pub goal: &'static str,
    /// Client challenge.
    pub challenge: &'static str,
    /// Financial product in question.
    pub product: &'static str,
}

/// Fill every placeholder in `pattern` from `params`.
pub fn render(pattern: &str, params: &BriefParams) -> String {
    pattern
        .replace("{age}", &params.age.to_string())
        .replace("{family}", params.family)
        .replace("{income}", &format_money(params.income))
        .replace("{assets}", &format_money(params.assets))
        .replace("{debt}", &format_money(params.debt))
        .replace("{rsu}", &format_money(params.income / 2))
        .replace("{exit_value}", &format_money(params.assets.saturating_mul(2)))
        .replace("{goal}", params.goal)
        .replace("{challenge}", params.challenge)
        .replace("{product}", params.product)
}

/// Format whole dollars as `$1,234,567`.
pub fn format_money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len().saturating_mul(2));
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && digits.len().saturating_sub(i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
