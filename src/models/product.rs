use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: ProductCategory,
    #[serde(default)]
    pub brand: Option<String>,
    pub price_per_day: f64,
    #[serde(default)]
    pub deposit: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default = "default_true")]
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Product {
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub fn has_coordinates(&self) -> bool {
        self.coordinates().is_some()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Camera,
    Lens,
    Lighting,
    Audio,
    Drone,
    Accessory,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub owner_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: ProductCategory,
    #[serde(default)]
    pub brand: Option<String>,
    pub price_per_day: f64,
    #[serde(default)]
    pub deposit: Option<f64>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ProductCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    Name,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<ProductCategory>,
    pub q: Option<String>,
    pub max_price: Option<f64>,
    #[serde(default)]
    pub available_only: bool,
    #[serde(default)]
    pub sort: ProductSort,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category {
            if product.category != category {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if product.price_per_day > max {
                return false;
            }
        }
        if self.available_only && !product.is_available {
            return false;
        }
        match self.q.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => {
                let q = q.to_lowercase();
                product.name.to_lowercase().contains(&q)
                    || product.description.to_lowercase().contains(&q)
                    || product
                        .brand
                        .as_deref()
                        .map(|b| b.to_lowercase().contains(&q))
                        .unwrap_or(false)
            }
            _ => true,
        }
    }
}

pub fn filter_products(products: Vec<Product>, filter: &ProductFilter) -> Vec<Product> {
    let mut matched: Vec<Product> = products.into_iter().filter(|p| filter.matches(p)).collect();

    match filter.sort {
        ProductSort::Newest => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        ProductSort::PriceAsc => matched.sort_by(|a, b| a.price_per_day.total_cmp(&b.price_per_day)),
        ProductSort::PriceDesc => {
            matched.sort_by(|a, b| b.price_per_day.total_cmp(&a.price_per_day))
        }
        ProductSort::Name => {
            matched.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }
    }

    matched
}


#[cfg(test)]
mod tests {
    use super::fixtures::product;
    use super::*;
    use chrono::Duration;

    fn catalog() -> Vec<Product> {
        let mut a7 = product("Sony A7 IV", ProductCategory::Camera, 45.0);
        a7.brand = Some("Sony".to_string());
        let mut lens = product("24-70mm f/2.8 GM", ProductCategory::Lens, 25.0);
        lens.brand = Some("Sony".to_string());
        lens.created_at += Duration::days(2);
        let mut light = product("Aputure 300d", ProductCategory::Lighting, 30.0);
        light.is_available = false;
        light.created_at += Duration::days(1);
        vec![a7, lens, light]
    }

    #[test]
    fn test_filter_by_category() {
        let filter = ProductFilter {
            category: Some(ProductCategory::Lens),
            ..Default::default()
        };
        let result = filter_products(catalog(), &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "24-70mm f/2.8 GM");
    }

    #[test]
    fn test_text_query_matches_brand_case_insensitive() {
        let filter = ProductFilter {
            q: Some("  sony ".to_string()),
            ..Default::default()
        };
        let result = filter_products(catalog(), &filter);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_available_only_and_max_price() {
        let filter = ProductFilter {
            max_price: Some(30.0),
            available_only: true,
            ..Default::default()
        };
        let result = filter_products(catalog(), &filter);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, ProductCategory::Lens);
    }

    #[test]
    fn test_sort_orders() {
        let newest = filter_products(catalog(), &ProductFilter::default());
        let names: Vec<_> = newest.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["24-70mm f/2.8 GM", "Aputure 300d", "Sony A7 IV"]);

        let by_price = filter_products(
            catalog(),
            &ProductFilter {
                sort: ProductSort::PriceDesc,
                ..Default::default()
            },
        );
        assert_eq!(by_price[0].price_per_day, 45.0);
        assert_eq!(by_price[2].price_per_day, 25.0);
    }

    #[test]
    fn test_cover_image_and_coordinates() {
        let mut p = product("Rode NTG5", ProductCategory::Audio, 12.0);
        assert_eq!(p.cover_image(), None);
        assert!(!p.has_coordinates());
        p.images = vec!["a/b/1.jpg".to_string(), "a/b/2.jpg".to_string()];
        p.latitude = Some(-6.2);
        p.longitude = Some(106.8);
        assert_eq!(p.cover_image(), Some("a/b/1.jpg"));
        assert_eq!(p.coordinates(), Some((-6.2, 106.8)));
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let update = ProductUpdate {
            price_per_day: Some(50.0),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"price_per_day": 50.0}));
    }
}
