use chrono::{DateTime, TimeZone, Utc};

use super::Deal;

fn expires(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single()
}

fn logo(domain: &str) -> Option<String> {
    Some(format!("https://logo.clearbit.com/{}", domain))
}

struct Base {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    price: f64,
    original_price: f64,
    discount_percentage: u32,
    merchant: &'static str,
    domain: &'static str,
    url: &'static str,
    category: &'static str,
}

impl Base {
    fn into_deal(self) -> Deal {
        Deal {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            price: self.price,
            original_price: self.original_price,
            discount_percentage: self.discount_percentage,
            merchant: self.merchant.to_string(),
            merchant_logo: logo(self.domain),
            url: self.url.to_string(),
            coupon_code: None,
            expiry_date: None,
            category: self.category.to_string(),
            is_hot: false,
            rating: None,
            affiliate_enabled: false,
        }
    }
}

/// The demo deals shipped with the binary
pub(super) fn builtin_deals() -> Vec<Deal> {
    vec![
        Deal {
            affiliate_enabled: true,
            coupon_code: Some("SAVE100".to_string()),
            expiry_date: expires(2025, 5, 15),
            is_hot: true,
            rating: Some(4.8),
            ..Base {
                id: "1",
                title: "Apple MacBook Air M2",
                description: "13.6-inch Liquid Retina Display, 8GB RAM, 256GB SSD Storage",
                price: 899.99,
                original_price: 1199.99,
                discount_percentage: 25,
                merchant: "Amazon",
                domain: "amazon.com",
                url: "https://amazon.com/deal/macbookair?tag=AFFILIATE_ID",
                category: "Electronics",
            }
            .into_deal()
        },
        Deal {
            rating: Some(4.7),
            ..Base {
                id: "2",
                title: "Samsung Galaxy S23 Ultra",
                description: "256GB, 12GB RAM, 200MP Camera, S Pen included",
                price: 899.99,
                original_price: 1199.99,
                discount_percentage: 25,
                merchant: "Best Buy",
                domain: "bestbuy.com",
                url: "https://bestbuy.com/deal/s23ultra",
                category: "Electronics",
            }
            .into_deal()
        },
        Deal {
            affiliate_enabled: true,
            is_hot: true,
            rating: Some(4.9),
            ..Base {
                id: "3",
                title: "Sony WH-1000XM5 Headphones",
                description: "Wireless Noise Cancelling Headphones with Auto Noise Cancelling Optimizer",
                price: 298.00,
                original_price: 399.99,
                discount_percentage: 25,
                merchant: "Amazon",
                domain: "amazon.com",
                url: "https://amazon.com/deal/sonywh1000?tag=AFFILIATE_ID",
                category: "Electronics",
            }
            .into_deal()
        },
        Deal {
            coupon_code: Some("RUNFAST".to_string()),
            expiry_date: expires(2025, 4, 30),
            rating: Some(4.5),
            ..Base {
                id: "4",
                title: "Nike Air Zoom Pegasus 39",
                description: "Men's Road Running Shoes, Multiple Colors Available",
                price: 89.97,
                original_price: 130.00,
                discount_percentage: 31,
                merchant: "Nike",
                domain: "nike.com",
                url: "https://nike.com/deal/pegasus39",
                category: "Clothing",
            }
            .into_deal()
        },
        Deal {
            affiliate_enabled: true,
            rating: Some(4.6),
            ..Base {
                id: "5",
                title: "Levi's 501 Original Fit Men's Jeans",
                description: "Classic straight leg jeans with button fly and signature leather patch",
                price: 39.99,
                original_price: 69.50,
                discount_percentage: 42,
                merchant: "Amazon",
                domain: "amazon.com",
                url: "https://amazon.com/deal/levis501?tag=AFFILIATE_ID",
                category: "Clothing",
            }
            .into_deal()
        },
        Deal {
            is_hot: true,
            rating: Some(4.8),
            ..Base {
                id: "6",
                title: "Ninja Foodi 12-in-1 Smart Air Fryer",
                description: "Pro Plus, with Smart Cook System and 7qt Capacity",
                price: 159.99,
                original_price: 299.99,
                discount_percentage: 47,
                merchant: "Walmart",
                domain: "walmart.com",
                url: "https://walmart.com/deal/ninjafoodi",
                category: "Home & Kitchen",
            }
            .into_deal()
        },
        Deal {
            affiliate_enabled: true,
            coupon_code: Some("BAKE50".to_string()),
            expiry_date: expires(2025, 5, 20),
            is_hot: true,
            rating: Some(4.9),
            ..Base {
                id: "7",
                title: "KitchenAid Artisan Series 5 Qt. Stand Mixer",
                description: "10-speed tilt-head stand mixer includes coated flat beater, coated dough hook, wire whip",
                price: 279.99,
                original_price: 449.99,
                discount_percentage: 38,
                merchant: "Amazon",
                domain: "amazon.com",
                url: "https://amazon.com/deal/kitchenaid?tag=AFFILIATE_ID",
                category: "Home & Kitchen",
            }
            .into_deal()
        },
        Deal {
            rating: Some(4.4),
            ..Base {
                id: "8",
                title: "Dyson Airwrap Multi-Styler Complete",
                description: "For multiple hair types and styles, includes 6 attachments",
                price: 479.99,
                original_price: 599.99,
                discount_percentage: 20,
                merchant: "Sephora",
                domain: "sephora.com",
                url: "https://sephora.com/deal/dysonairwrap",
                category: "Beauty & Personal Care",
            }
            .into_deal()
        },
        Deal {
            affiliate_enabled: true,
            rating: Some(4.7),
            ..Base {
                id: "9",
                title: "Olaplex Hair Perfector No. 3 Repairing Treatment",
                description: "Weekly at-home treatment, reduces breakage and visibly strengthens hair",
                price: 24.00,
                original_price: 30.00,
                discount_percentage: 20,
                merchant: "Amazon",
                domain: "amazon.com",
                url: "https://amazon.com/deal/olaplex?tag=AFFILIATE_ID",
                category: "Beauty & Personal Care",
            }
            .into_deal()
        },
        Deal {
            rating: Some(4.8),
            ..Base {
                id: "10",
                title: "Hydro Flask Water Bottle",
                description: "40 oz Wide Mouth with Flex Cap, Multiple Colors",
                price: 33.71,
                original_price: 44.95,
                discount_percentage: 25,
                merchant: "REI",
                domain: "rei.com",
                url: "https://rei.com/deal/hydroflask",
                category: "Sports & Outdoors",
            }
            .into_deal()
        },
        Deal {
            affiliate_enabled: true,
            is_hot: true,
            rating: Some(4.8),
            ..Base {
                id: "11",
                title: "Kindle Paperwhite",
                description: "8GB, Now with a 6.8\" display and adjustable warm light",
                price: 99.99,
                original_price: 139.99,
                discount_percentage: 29,
                merchant: "Amazon",
                domain: "amazon.com",
                url: "https://amazon.com/deal/kindle?tag=AFFILIATE_ID",
                category: "Books & Media",
            }
            .into_deal()
        },
        Deal {
            is_hot: true,
            rating: Some(4.9),
            ..Base {
                id: "12",
                title: "PlayStation 5 Console Slim",
                description: "Digital Edition with DualSense Wireless Controller",
                price: 399.99,
                original_price: 449.99,
                discount_percentage: 11,
                merchant: "GameStop",
                domain: "gamestop.com",
                url: "https://gamestop.com/deal/ps5slim",
                category: "Gaming",
            }
            .into_deal()
        },
        Deal {
            affiliate_enabled: true,
            rating: Some(4.8),
            ..Base {
                id: "13",
                title: "Nintendo Switch OLED Model",
                description: "With White Joy-Con controllers",
                price: 319.99,
                original_price: 349.99,
                discount_percentage: 9,
                merchant: "Amazon",
                domain: "amazon.com",
                url: "https://amazon.com/deal/switcholed?tag=AFFILIATE_ID",
                category: "Gaming",
            }
            .into_deal()
        },
        Deal {
            rating: Some(4.6),
            ..Base {
                id: "14",
                title: "IKEA POÄNG Armchair",
                description: "Birch veneer with cushion, multiple colors available",
                price: 129.00,
                original_price: 179.00,
                discount_percentage: 28,
                merchant: "IKEA",
                domain: "ikea.com",
                url: "https://ikea.com/deal/poang",
                category: "Furniture",
            }
            .into_deal()
        },
        Deal {
            affiliate_enabled: true,
            coupon_code: Some("COFFEE20".to_string()),
            expiry_date: expires(2025, 5, 25),
            rating: Some(4.5),
            ..Base {
                id: "15",
                title: "Nespresso Vertuo Next Coffee Machine",
                description: "By De'Longhi with Aeroccino Milk Frother",
                price: 164.99,
                original_price: 229.99,
                discount_percentage: 28,
                merchant: "Amazon",
                domain: "amazon.com",
                url: "https://amazon.com/deal/nespresso?tag=AFFILIATE_ID",
                category: "Grocery",
            }
            .into_deal()
        },
    ]
}
