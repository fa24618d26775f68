pub mod booking;
pub mod product;
pub mod report;
pub mod session;
pub mod user;

pub use booking::{BookedProduct, Booking, BookingStatus, DeliveryMethod, NewBooking, PaymentStatus};
pub use product::{
    filter_products, NewProduct, Product, ProductCategory, ProductFilter, ProductSort,
    ProductUpdate,
};
pub use report::{NewReport, Report, ReportReason, ReportStatus};
pub use session::{AuthSession, AuthUser, Session};
pub use user::{ProfileUpdate, UserProfile, UserRole};
