use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    catalog::{Facets, FilterOption, Pagination, ProductListQuery, ProductListResponse, SortBy, SortOrder, Summary},
    comparison::{ComparisonRequest, ComparisonTableData, ComparisonTableProduct, CompetitorInput, PrimaryInput, SourceProduct},
    dto::{
        comparison::SourceProductData,
        products::{ManualEntryData, ManualEntryRequest},
        validation::{ProductValidation, SetValidationRequest, ValidationOverview},
        wizard::{DroppedSession, WizardInputRequest},
    },
    models::{
        Currency, ManualComparisonData, MatchType, MatchedProduct, PriceCategory, PriceHistoryPoint, PriceStatus,
        ProductComparison, ProductComparisonDetail, RetailerMatch, RetailerPrice, ValidationStatus,
    },
    reconcile::{PriceCell, ProductDetailView, ProductListView, ProductRow},
    response::{ApiResponse, Meta},
    routes::{catalog, comparison, health, manual_products, products, validation, wizard as wizard_routes},
    stores::ProductPatch,
    wizard::{
        CompetitorEntry, Notification, NotificationKind, PrimaryErrors, ValidationErrors, WizardResults, WizardStage,
        WizardView,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::export_products,
        products::get_product,
        products::get_manual_entry,
        products::set_manual_entry,
        products::clear_manual_entry,
        catalog::list_products,
        catalog::get_product,
        validation::list_all,
        validation::get_for_product,
        validation::set_status,
        validation::clear,
        manual_products::list,
        manual_products::get_one,
        manual_products::update,
        manual_products::delete,
        manual_products::clear_all,
        comparison::compare,
        comparison::lookup_source,
        wizard_routes::create,
        wizard_routes::get_session,
        wizard_routes::drop_session,
        wizard_routes::set_input,
        wizard_routes::add_competitor,
        wizard_routes::remove_competitor,
        wizard_routes::review,
        wizard_routes::edit,
        wizard_routes::confirm,
        wizard_routes::restart
    ),
    components(
        schemas(
            Currency,
            PriceStatus,
            PriceCategory,
            ValidationStatus,
            RetailerPrice,
            ProductComparison,
            MatchType,
            MatchedProduct,
            RetailerMatch,
            PriceHistoryPoint,
            ProductComparisonDetail,
            ManualComparisonData,
            ProductListQuery,
            SortBy,
            SortOrder,
            Pagination,
            FilterOption,
            Facets,
            Summary,
            ProductListResponse,
            PriceCell,
            ProductRow,
            ProductListView,
            ProductDetailView,
            ProductPatch,
            PrimaryInput,
            CompetitorInput,
            ComparisonRequest,
            ComparisonTableProduct,
            ComparisonTableData,
            SourceProduct,
            SourceProductData,
            ManualEntryRequest,
            ManualEntryData,
            SetValidationRequest,
            ProductValidation,
            ValidationOverview,
            WizardStage,
            CompetitorEntry,
            PrimaryErrors,
            ValidationErrors,
            NotificationKind,
            Notification,
            WizardResults,
            WizardView,
            WizardInputRequest,
            DroppedSession,
            health::HealthData,
            Meta,
            ApiResponse<ProductListView>,
            ApiResponse<ProductDetailView>,
            ApiResponse<ProductComparison>,
            ApiResponse<WizardView>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Merged product list, detail and CSV export"),
        (name = "Catalog", description = "Bundled mock catalog"),
        (name = "Validation", description = "Match judgments"),
        (name = "Manual Products", description = "Comparisons saved from the wizard"),
        (name = "Comparison", description = "Mock comparison engine"),
        (name = "Wizard", description = "Input, review and results flow for new comparisons"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
