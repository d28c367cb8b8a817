//! Static persona and product catalog.
//!
//! Personas follow the wealth tiers and client segments the generated
//! briefs are meant to cover. Ranges are inclusive.

/// A client archetype constraining the values sampled for a brief.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    /// Display name, also used as the key in configuration.
    pub name: &'static str,
    /// Client age in years.
    pub age_range: (u32, u32),
    /// Annual income in dollars.
    pub income_range: (u64, u64),
    /// Investable assets in dollars.
    pub asset_range: (u64, u64),
    /// Goals a client in this segment typically brings.
    pub goals: &'static [&'static str],
    /// Typical difficulties.
    pub challenges: &'static [&'static str],
    /// Household and life situations.
    pub families: &'static [&'static str],
}

/// Every persona known to the synthesizer, in catalog order.
pub const PERSONAS: &[Persona] = &[
    Persona {
        name: "Premier Mass Affluent",
        age_range: (28, 42),
        income_range: (120_000, 250_000),
        asset_range: (250_000, 1_000_000),
        goals: &[
            "grow investment portfolio to reach Jade tier",
            "international property investment",
            "children's overseas education planning",
            "build diversified portfolio",
            "maximize tax-advantaged retirement accounts",
        ],
        challenges: &[
            "managing wealth across multiple countries",
            "understanding cross-border tax implications",
            "balancing growth vs stability",
            "optimizing international banking relationships",
        ],
        families: &[
            "expat family with children",
            "dual-income international professionals",
            "returning to home country after abroad",
            "relocating family for career",
        ],
    },
    Persona {
        name: "Jade Affluent",
        age_range: (38, 58),
        income_range: (300_000, 800_000),
        asset_range: (1_000_000, 5_000_000),
        goals: &[
            "access alternative investments",
            "multi-generational wealth planning",
            "establish family trust structures",
            "philanthropic giving strategy",
            "succession planning for family business",
        ],
        challenges: &[
            "coordinating wealth across Hong Kong, Singapore and the UK",
            "ESG investing alignment",
            "managing concentrated stock positions",
            "structuring cross-border inheritance",
        ],
        families: &[
            "business owner with adult children",
            "family office consideration",
            "first-generation wealth creator",
            "managing inherited family assets",
        ],
    },
    Persona {
        name: "Private Banking HNW",
        age_range: (45, 70),
        income_range: (500_000, 3_000_000),
        asset_range: (5_000_000, 30_000_000),
        goals: &[
            "sophisticated trust and estate planning",
            "impact investing and sustainable portfolios",
            "art and alternative asset diversification",
            "next-generation wealth education",
            "global citizenship and residency planning",
        ],
        challenges: &[
            "complex multi-jurisdictional tax planning",
            "managing private equity illiquidity",
            "family governance and wealth transfer",
            "protecting wealth from regulatory changes",
        ],
        families: &[
            "entrepreneur preparing for business exit",
            "multi-generational family wealth",
            "philanthropist establishing foundation",
            "managing family office transition",
        ],
    },
    Persona {
        name: "Emerging Wealth",
        age_range: (25, 38),
        income_range: (90_000, 300_000),
        asset_range: (50_000, 600_000),
        goals: &[
            "stock option exercise strategy",
            "first-time international property purchase",
            "startup equity portfolio management",
            "build sustainable investment portfolio",
            "leverage digital wealth tools",
        ],
        challenges: &[
            "concentrated position in employer stock",
            "understanding RSU/ISO tax treatment",
            "navigating crypto and digital assets",
            "balancing FOMO with prudent investing",
        ],
        families: &[
            "tech worker with equity compensation",
            "startup founder post-funding",
            "single professional in tier-1 city",
            "young couple expecting first child",
        ],
    },
    Persona {
        name: "International Cross-Border",
        age_range: (35, 60),
        income_range: (200_000, 900_000),
        asset_range: (400_000, 3_000_000),
        goals: &[
            "optimize multi-currency portfolio",
            "coordinate wealth across the Asia-Middle East corridor",
            "international school funding strategy",
            "repatriation and retirement planning",
            "Greater Bay Area wealth management",
        ],
        challenges: &[
            "currency hedging across USD, GBP, HKD and SGD",
            "regulatory compliance across jurisdictions",
            "managing banking relationships in 3+ countries",
            "understanding wealth connect schemes",
        ],
        families: &[
            "expat in UAE or Singapore hub",
            "split family across multiple countries",
            "returning to mainland China",
            "commuting between Hong Kong and Shenzhen",
        ],
    },
    Persona {
        name: "Entrepreneur",
        age_range: (40, 65),
        income_range: (250_000, 2_000_000),
        asset_range: (500_000, 10_000_000),
        goals: &[
            "business exit and liquidity planning",
            "separate business and personal wealth",
            "key person insurance strategy",
            "funding next generation's entrepreneurship",
            "transition from working capital to invested capital",
        ],
        challenges: &[
            "business valuation and sale readiness",
            "protecting family from business risk",
            "managing lumpy irregular income",
            "choosing between dividends vs reinvestment",
        ],
        families: &[
            "family business with multiple siblings",
            "solo founder considering partners",
            "second-generation taking over business",
            "serial entrepreneur with multiple ventures",
        ],
    },
    Persona {
        name: "Sustainable Wealth",
        age_range: (30, 55),
        income_range: (150_000, 600_000),
        asset_range: (200_000, 2_000_000),
        goals: &[
            "build 100% ESG-aligned portfolio",
            "measure social impact of investments",
            "establish charitable giving vehicle",
            "align wealth with UN SDG goals",
            "invest in climate solutions and green bonds",
        ],
        challenges: &[
            "understanding ESG ratings and greenwashing",
            "balancing impact with returns",
            "finding authentic sustainable investment opportunities",
            "measuring real-world impact",
        ],
        families: &[
            "socially conscious millennial couple",
            "impact-focused entrepreneur",
            "family transitioning to sustainable investing",
            "next-gen demanding ESG alignment",
        ],
    },
    Persona {
        name: "Wealth Preservation",
        age_range: (60, 80),
        income_range: (80_000, 400_000),
        asset_range: (500_000, 5_000_000),
        goals: &[
            "generate sustainable retirement income",
            "healthcare and longevity planning",
            "minimize estate taxes and probate",
            "support grandchildren's education globally",
            "maintain lifestyle across multiple residences",
        ],
        challenges: &[
            "sequence of returns risk",
            "required minimum distributions strategy",
            "long-term care insurance evaluation",
            "managing property across countries",
        ],
        families: &[
            "recently retired executive",
            "widowed with adult children abroad",
            "snowbird between two countries",
            "grandparents funding education trusts",
        ],
    },
];

/// A named group of financial products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductCategory {
    /// Category key.
    pub name: &'static str,
    /// Products in this category.
    pub products: &'static [&'static str],
}

/// Products a brief may ask about.
pub const PRODUCT_CATEGORIES: &[ProductCategory] = &[
    ProductCategory {
        name: "investment",
        products: &[
            "equity mutual funds",
            "fixed income funds",
            "ETFs",
            "target-date funds",
            "money market funds",
            "structured products",
            "discretionary portfolio management",
        ],
    },
    ProductCategory {
        name: "sustainable",
        products: &[
            "ESG equity funds",
            "green bonds",
            "social bonds",
            "sustainability-linked bonds",
            "impact investing mandates",
            "climate solutions portfolio",
        ],
    },
    ProductCategory {
        name: "cross_border",
        products: &[
            "multi-currency account",
            "Greater Bay Area wealth connect",
            "cross-border mortgage",
            "currency hedging strategies",
        ],
    },
    ProductCategory {
        name: "trust_estate",
        products: &[
            "revocable living trust",
            "irrevocable trust",
            "charitable remainder trust",
            "generation-skipping trust",
            "succession planning services",
        ],
    },
    ProductCategory {
        name: "insurance",
        products: &[
            "term life insurance",
            "whole life insurance",
            "key person insurance",
            "umbrella liability policy",
            "international health insurance",
        ],
    },
    ProductCategory {
        name: "retirement",
        products: &[
            "401(k)",
            "Roth IRA",
            "SEP IRA",
            "pension rollover",
            "annuities with guaranteed income",
        ],
    },
    ProductCategory {
        name: "alternative",
        products: &[
            "private equity funds",
            "hedge funds",
            "real estate investment trusts",
            "art and collectibles financing",
            "venture capital funds",
        ],
    },
    ProductCategory {
        name: "education",
        products: &[
            "529 plan",
            "Coverdell ESA",
            "UGMA/UTMA accounts",
            "education trusts for grandchildren",
        ],
    },
    ProductCategory {
        name: "business",
        products: &[
            "buy-sell agreements",
            "stock option exercise planning",
            "RSU/ISO tax strategies",
            "family office setup",
        ],
    },
    ProductCategory {
        name: "tax",
        products: &[
            "tax-loss harvesting",
            "donor-advised funds",
            "multi-jurisdictional tax optimization",
            "expatriate tax planning",
        ],
    },
];

/// Look up a persona by exact name.
pub fn find_persona(name: &str) -> Option<&'static Persona> {
    PERSONAS.iter().find(|p| p.name == name)
}
