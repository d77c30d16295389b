pub mod brand;
pub mod category;
pub mod comment;
pub mod product;
pub mod product_category;
pub mod review;
