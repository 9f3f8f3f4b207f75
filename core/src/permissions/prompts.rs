//! User-facing prompt copy for permission requests and battery dialogs

use crate::platform::bridge::{CapabilityId, PromptSpec};

/// Title of the battery excursion prompt
pub const BATTERY_PROMPT_TITLE: &str = "Battery Optimization";

/// Body of the battery excursion prompt
pub const BATTERY_PROMPT_MESSAGE: &str = "To ensure the app works properly in the background, \
     please disable battery optimization for this app. \
     You will be redirected to the settings.";

/// Title of the post-return attestation prompt
pub const BATTERY_CONFIRM_TITLE: &str = "Battery Optimization Status";

/// Body of the post-return attestation prompt
pub const BATTERY_CONFIRM_MESSAGE: &str =
    "Did you disable battery optimization for this app in the settings?";

/// Rationale copy shown with the platform prompt for a capability
pub fn prompt_for(capability: CapabilityId) -> PromptSpec {
    match capability {
        CapabilityId::FineLocation => PromptSpec::new(
            "Location Permission Required",
            "This app needs access to your location to provide location-based services.",
        ),
        CapabilityId::ActivityRecognition => PromptSpec::new(
            "Physical Activity Permission Required",
            "This app needs access to your physical activity data to track if you are \
             walking, driving or running",
        ),
        // Scan and connect are requested together in one platform prompt;
        // the shared rationale covers both.
        CapabilityId::BluetoothScan | CapabilityId::BluetoothConnect => PromptSpec::new(
            "Bluetooth Permission Required",
            "This app needs Bluetooth access to discover and connect to nearby devices.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_capability_has_copy() {
        for capability in [
            CapabilityId::FineLocation,
            CapabilityId::ActivityRecognition,
            CapabilityId::BluetoothScan,
            CapabilityId::BluetoothConnect,
        ] {
            let prompt = prompt_for(capability);
            assert!(!prompt.title.is_empty());
            assert!(!prompt.message.is_empty());
        }
    }

    #[test]
    fn test_location_copy_matches_product_text() {
        let prompt = prompt_for(CapabilityId::FineLocation);
        assert_eq!(prompt.title, "Location Permission Required");
    }
}
