//! Aggregation pipelines for flattening user HGU documents into one record
//! per connected station. The server does all of the work; these functions
//! only assemble the stage documents.

use bson::{doc, Bson, Document};

pub const STATION_TYPES: [&str; 18] = [
    "Wireless Bridge",
    "Network Equipment",
    "Router",
    "WiFi Extender",
    "Gaming Console",
    "Raspberry",
    "Smartphone",
    "PC",
    "Video Doorbell",
    "Smart Air Ventilator",
    "Smart Bulb",
    "Smart Plug",
    "eBook",
    "Printer",
    "Smart Scale",
    "Tablet",
    "TV Dongle",
    "Smartwatch",
];

/// Supplies the projection fields that have no source data yet and are
/// filled with generated values instead.
pub trait FieldSynthesizer: Send + Sync {
    /// Output field name to aggregation expression.
    fn fields(&self) -> Document;
}

/// A plain document synthesizes the same literal expressions every time.
impl FieldSynthesizer for Document {
    fn fields(&self) -> Document {
        self.clone()
    }
}

/// Samples `STATION_TYPE_CD` uniformly from a category list and sets
/// `STATION_RANDOM_MAC_IND` with a fixed probability, both through the
/// server-side `$rand` operator.
#[derive(Debug, Clone)]
pub struct RandomStationSynthesizer {
    categories: Vec<String>,
    random_mac_probability: f64,
}

impl Default for RandomStationSynthesizer {
    fn default() -> Self {
        Self {
            categories: STATION_TYPES.iter().map(|s| s.to_string()).collect(),
            random_mac_probability: 0.5,
        }
    }
}

impl RandomStationSynthesizer {
    pub fn new(categories: Vec<String>, random_mac_probability: f64) -> Self {
        Self {
            categories,
            random_mac_probability: random_mac_probability.clamp(0.0, 1.0),
        }
    }

    fn station_type(&self) -> Bson {
        if self.categories.is_empty() {
            return Bson::Null;
        }

        let categories: Vec<Bson> = self.categories.iter().cloned().map(Bson::String).collect();
        let len = self.categories.len() as i32;

        Bson::Document(doc! {
            "$arrayElemAt": [
                { "$literal": categories },
                { "$floor": { "$multiply": [{ "$rand": {} }, len] } },
            ]
        })
    }

    fn random_mac(&self) -> Bson {
        Bson::Document(doc! {
            "$gte": [{ "$rand": {} }, 1.0 - self.random_mac_probability]
        })
    }
}

impl FieldSynthesizer for RandomStationSynthesizer {
    fn fields(&self) -> Document {
        doc! {
            "STATION_TYPE_CD": self.station_type(),
            "STATION_RANDOM_MAC_IND": self.random_mac(),
        }
    }
}

/// One document per (user, hgu, device).
pub fn unwind_devices() -> Vec<Document> {
    vec![
        doc! { "$unwind": "$hgus" },
        doc! { "$unwind": "$hgus.devices" },
    ]
}

pub fn count_devices_pipeline() -> Vec<Document> {
    let mut pipeline = unwind_devices();
    pipeline.push(doc! { "$count": "devices" });
    pipeline
}

pub fn station_projection(synthesizer: &dyn FieldSynthesizer) -> Document {
    let upper_mac = doc! { "$toUpper": "$hgus.devices.mac" };

    let mut projection = doc! {
        "_id": { "$concat": ["$_id", "-", upper_mac.clone()] },
        "USER_4P_ID": "$_id",
        "ASSOC_MAC_DES": upper_mac,
        "DEVICE_ID": "$hgus.id",
        "PHONE_WITH_PREFIX_ID": { "$arrayElemAt": ["$hgus.identities.value", 0] },
        "STATION_OS_DES": { "$literal": Bson::Null },
        "STATION_OS_KERNEL_DES": { "$literal": Bson::Null },
        "STATION_MODEL_DES": "Random Model",
        "STATION_MODEL_VERSION_DES": "Random Model Version",
        "STATION_BRAND_DES": "Random Brand",
        "STATION_MAC_VENDOR_DES": "Random Vendor",
    };

    for (field, expression) in synthesizer.fields() {
        projection.insert(field, expression);
    }

    doc! { "$project": projection }
}

/// Update matching `_id`s in place, insert the rest.
pub fn merge_stage(target_db: &str, target_collection: &str) -> Document {
    doc! {
        "$merge": {
            "into": { "db": target_db, "coll": target_collection },
            "whenMatched": "merge",
            "whenNotMatched": "insert",
        }
    }
}

pub fn station_pipeline(
    synthesizer: &dyn FieldSynthesizer,
    target_db: &str,
    target_collection: &str,
) -> Vec<Document> {
    let mut pipeline = unwind_devices();
    pipeline.push(station_projection(synthesizer));
    pipeline.push(merge_stage(target_db, target_collection));
    pipeline
}
