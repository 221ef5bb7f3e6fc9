use serde::{Deserialize, Serialize};

/// Data stored in the cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheData {
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_data_serialization() {
        // Given a CacheData instance
        let data = CacheData {
            value: "{\"email\":\"new@example.com\"}".to_string(),
        };

        // When serializing to JSON
        let json = serde_json::to_string(&data).expect("Failed to serialize CacheData");

        // Then it should produce valid JSON with the expected structure
        assert_eq!(json, "{\"value\":\"{\\\"email\\\":\\\"new@example.com\\\"}\"}");
    }

    #[test]
    fn test_cache_data_deserialization() {
        // Given a JSON string representing CacheData
        let json = "{\"value\":\"test value\"}";

        // When deserializing from JSON
        let data: CacheData = serde_json::from_str(json).expect("Failed to deserialize CacheData");

        // Then it should produce a CacheData instance with the expected value
        assert_eq!(data.value, "test value");
    }
}
