/// Lazy iterator over a path and its ancestors
///
/// For path `/a/b/c`, yields: `/a/b/c` → `/a/b` → `/a` → `/`
///
/// Borrows from the input and allocates nothing. Layout chains are built
/// by collecting this sequence and reversing it (root first).
///
/// # Examples
///
/// ```
/// use trellis_router::path::PathHierarchy;
///
/// let paths: Vec<&str> = PathHierarchy::new("/author/[slug]").collect();
/// assert_eq!(paths, vec!["/author/[slug]", "/author", "/"]);
/// ```
#[derive(Debug, Clone)]
pub struct PathHierarchy<'a> {
    current: Option<&'a str>,
}

impl<'a> PathHierarchy<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            current: Some(path),
        }
    }
}

impl<'a> Iterator for PathHierarchy<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;

        self.current = if current == "/" {
            None
        } else if let Some(slash_pos) = current.rfind('/') {
            if slash_pos == 0 {
                Some("/")
            } else {
                Some(&current[..slash_pos])
            }
        } else {
            None
        };

        Some(current)
    }
}
