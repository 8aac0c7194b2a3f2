//! poster-wall/crates/pw-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Poster-Wall.

pub mod models;
pub mod traits;
pub mod error;

// Re-exporting for easier access in other crates
pub use models::*;
pub use traits::*;
pub use error::*;


#[cfg(test)]
mod tests {
    use super::models::*;

    #[test]
    fn test_new_poster_defaults() {
        let poster = Poster::new("Dune".to_string(), "/uploads/1.png".to_string());
        assert_eq!(poster.likes, 0);
        assert!(poster.comments.is_empty());
        assert_eq!(poster.created_at, poster.updated_at);
        assert_eq!(poster.display_date, Some(poster.created_at));
    }

    #[test]
    fn test_parse_tags_trims_and_drops_empties() {
        assert_eq!(
            parse_tags(" sci-fi , classic ,, movie "),
            vec!["sci-fi", "classic", "movie"]
        );
        assert!(parse_tags("  ").is_empty());
    }

    #[test]
    fn test_poster_wire_shape_is_camel_case() {
        let poster = Poster::new("Dune".to_string(), "/uploads/1.png".to_string());
        let json = serde_json::to_value(&poster).unwrap();
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("displayDate").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("image_url").is_none());
    }
}
