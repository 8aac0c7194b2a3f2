use askama::Template;
use pw_core::models::Poster;

#[derive(Template)]
#[template(path = "gallery.html")]
pub struct GalleryTemplate<'a> {
    pub posters: &'a Vec<Poster>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pw_core::models::Comment;

    #[test]
    fn test_gallery_renders_posters_and_comments() {
        let mut poster = Poster::new("Blade Runner".to_string(), "/uploads/br.png".to_string());
        poster.category = Some("movies".to_string());
        poster.tags = vec!["sci-fi".to_string()];
        poster.comments.push(Comment {
            text: "a classic".to_string(),
            author: "deckard".to_string(),
            created_at: poster.created_at,
        });

        let html = GalleryTemplate { posters: &vec![poster] }.render().unwrap();
        assert!(html.contains("Blade Runner"));
        assert!(html.contains("/uploads/br.png"));
        assert!(html.contains("a classic"));
        assert!(html.contains("deckard"));
    }

    #[test]
    fn test_gallery_escapes_markup_in_titles() {
        let poster = Poster::new("<script>x</script>".to_string(), "/uploads/x.png".to_string());
        let html = GalleryTemplate { posters: &vec![poster] }.render().unwrap();
        assert!(!html.contains("<script>x</script>"));
    }
}
