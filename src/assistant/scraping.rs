use futures::future::join_all;
use rand::Rng;
use std::time::Duration;
use tracing::debug;

/// Deal and price comparison sites the simulated scrape pretends to visit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceSite {
    PriceRunner,
    Slickdeals,
    RetailMeNot,
    CouponFollow,
    Honey,
}

impl SourceSite {
    pub const ALL: [SourceSite; 5] = [
        SourceSite::PriceRunner,
        SourceSite::Slickdeals,
        SourceSite::RetailMeNot,
        SourceSite::CouponFollow,
        SourceSite::Honey,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SourceSite::PriceRunner => "PriceRunner",
            SourceSite::Slickdeals => "Slickdeals",
            SourceSite::RetailMeNot => "RetailMeNot",
            SourceSite::CouponFollow => "CouponFollow",
            SourceSite::Honey => "Honey",
        }
    }

    async fn visit(self, latency: Duration) -> SourceSite {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        debug!("Simulated scrape of {} finished", self.name());
        self
    }
}

const RETAILERS: [&str; 4] = ["Amazon", "Walmart", "Target", "Best Buy"];

/// Stand-in for scraping deal sites: waits, then returns canned findings
pub struct ScrapeSimulator {
    latency: Duration,
}

impl ScrapeSimulator {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Visit every site concurrently, then assemble `"<Site>: <finding>"` lines
    pub async fn gather(&self, query: &str) -> Vec<String> {
        let visited = join_all(SourceSite::ALL.iter().map(|site| site.visit(self.latency))).await;
        debug!("Visited {} sources for '{}'", visited.len(), query);

        findings_for(query, &mut rand::thread_rng())
    }
}

/// Canned findings keyed on product words, otherwise randomized generic lines
pub fn findings_for<R: Rng>(query: &str, rng: &mut R) -> Vec<String> {
    let lower = query.to_lowercase();

    if lower.contains("airpods") || lower.contains("airpod") {
        vec![
            "PriceRunner: Apple AirPods Pro (2nd Gen) prices range from $189.99-$249.00 across 24 retailers. Lowest at Amazon.".to_string(),
            "Slickdeals: DEAL ALERT: Apple AirPods Pro for $179.00 at Walmart with code AUDIO20 until Apr 30.".to_string(),
            "RetailMeNot: Amazon offering $60 off AirPods Pro with Prime membership, bringing price to $189.00.".to_string(),
            "CouponFollow: Best Buy coupon 'AUDIO15' gives additional 5% off AirPods, confirmed working today.".to_string(),
        ]
    } else if lower.contains("gaming laptop") || lower.contains("laptop for gaming") {
        vec![
            "PriceRunner: ASUS ROG Strix G15 (RTX 4060) prices from $1,199-$1,699 across 18 retailers.".to_string(),
            "Slickdeals: HOT! MSI Katana gaming laptop with RTX 4060 for $899 at Best Buy (50+ upvotes).".to_string(),
            "RetailMeNot: Lenovo offering 15% student discount on all Legion gaming laptops with code 'STUDENT15'.".to_string(),
            "Honey: Automatically applied $150 coupon on Dell G15 at Dell.com, dropping price to $799.99.".to_string(),
        ]
    } else if lower.contains("kitchen") || lower.contains("appliance") {
        vec![
            "PriceRunner: Ninja Foodi Smart XL Grill price history shows current $159.99 is 47% below average.".to_string(),
            "Slickdeals: KitchenAid Stand Mixer Professional 5qt for $279.99 at Target (regular $429.99).".to_string(),
            "RetailMeNot: Bed Bath and Beyond 20% off single item coupon applicable to most kitchen appliances.".to_string(),
            "CouponFollow: Instant Pot Duo 7-in-1 price dropped to $69.99 on Amazon, historically low price.".to_string(),
        ]
    } else {
        generic_findings(query, rng)
    }
}

fn generic_findings<R: Rng>(query: &str, rng: &mut R) -> Vec<String> {
    let retailer = RETAILERS[rng.gen_range(0..RETAILERS.len())];
    vec![
        format!(
            "PriceRunner: Found {} retailers selling \"{}\" with prices ranging from ${} to ${}.",
            rng.gen_range(10..40),
            query,
            rng.gen_range(50..150),
            rng.gen_range(200..500),
        ),
        format!(
            "Slickdeals: {} active community deals for \"{}\" with the hottest at {} upvotes.",
            rng.gen_range(0..10),
            query,
            rng.gen_range(10..60),
        ),
        format!(
            "RetailMeNot: {} active coupon codes for \"{}\" with success rates between 70-95%.",
            rng.gen_range(1..6),
            query,
        ),
        format!(
            "CouponFollow: Recent price drop for \"{}\" detected at {}, now {}% below average.",
            query,
            retailer,
            rng.gen_range(10..40),
        ),
    ]
}
