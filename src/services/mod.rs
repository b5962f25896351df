pub mod catalog_service;
pub mod comparison_service;
pub mod manual_product_service;
pub mod product_service;
pub mod validation_service;
pub mod wizard_service;
