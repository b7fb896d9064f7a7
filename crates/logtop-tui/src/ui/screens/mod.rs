mod top_view;

pub use top_view::TopScreen;
