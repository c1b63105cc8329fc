pub type PageView = crate::view_models::HomeView;
