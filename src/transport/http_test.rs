#[cfg(test)]
mod tests {
    use super::super::http::{HttpErrorResponse, WeatherBody, WeatherQuery};

    #[test]
    fn test_missing_query_params_default_to_empty() {
        // Missing parameters must flow into validation, not be a parse error
        let query: WeatherQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.city, "");
        assert_eq!(query.country, "");

        let query: WeatherQuery = serde_json::from_str(r#"{"city": "London"}"#).unwrap();
        assert_eq!(query.city, "London");
        assert_eq!(query.country, "");
    }

    #[test]
    fn test_response_body_shapes() {
        let body = WeatherBody {
            description: "clear sky".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"description":"clear sky"}"#);

        let error: HttpErrorResponse =
            serde_json::from_str(r#"{"error": "Rate limit exceeded. Try again later."}"#).unwrap();
        assert_eq!(error.error, "Rate limit exceeded. Try again later.");
    }
}
