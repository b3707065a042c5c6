//! Offset pagination on top of a query builder.
//!
//! ```ignore
//! let mut paginator: Paginator<Vec<account::Model>> = Paginator::new(request);
//! let scope = paginator.scope();
//!
//! let base = Account::find().filter(account::Column::Name.contains(&query));
//! paginator.set_count(CountQuery::new(base.clone(), &db)).await?;
//!
//! let rows = scope(base).all(&db).await?;
//! paginator.paginate(rows);
//! ```

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use sea_orm::{ConnectionTrait, DbErr, PaginatorTrait, QueryOrder, QuerySelect};
use sea_query::{Alias, Expr, Order, SimpleExpr};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use typed_builder::TypedBuilder;
use validator::Validate;

pub const DEFAULT_LIMIT: i32 = 10;
pub const DEFAULT_PAGE: i32 = 1;
pub const DEFAULT_SORT: &str = "asc";
pub const DEFAULT_ORDER: &str = "id";

lazy_static! {
    static ref RE_SORT: Regex = Regex::new(r"^(?i:asc|desc)?$").unwrap();
    static ref RE_ORDER_COLUMN: Regex = Regex::new(
        r"^([A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?)?$"
    )
    .unwrap();
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` in any case selects descending order, everything else ascending.
    pub fn from_sort(sort: &str) -> Self {
        if sort.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        }
    }
}

/// Paging parameters as supplied by a caller.
///
/// Every field may be left unset; [`PageRequest::normalize`] fills in the
/// defaults.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Validate,
    TypedBuilder,
    utoipa::IntoParams,
    utoipa::ToSchema,
)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// Maximum number of rows per page.
    #[builder(default)]
    #[param(example = 10, default = 10)]
    pub limit: i32,
    /// 1-based page number.
    #[builder(default)]
    #[param(example = 1, default = 1)]
    pub page: i32,
    /// Sort direction, `asc` or `desc`.
    #[builder(default, setter(into))]
    #[validate(regex(path = *RE_SORT))]
    #[param(example = "asc", default = "asc")]
    pub sort: String,
    /// Column the rows are ordered by, optionally qualified as `table.column`.
    #[builder(default, setter(into))]
    #[validate(regex(path = *RE_ORDER_COLUMN))]
    #[param(example = "id", default = "id")]
    pub order: String,
}

impl PageRequest {
    /// Replaces unset or non-positive values with the defaults. Idempotent.
    pub fn normalize(&mut self) {
        if self.limit <= 0 {
            self.limit = DEFAULT_LIMIT;
        }
        if self.page <= 0 {
            self.page = DEFAULT_PAGE;
        }
        if self.sort.is_empty() {
            self.sort = DEFAULT_SORT.to_string();
        }
        if self.order.is_empty() {
            self.order = DEFAULT_ORDER.to_string();
        }
    }

    /// Number of rows to skip. Only meaningful after [`PageRequest::normalize`].
    pub fn offset(&self) -> u64 {
        let page = u64::try_from(self.page.max(1)).unwrap_or(1);
        let limit = u64::try_from(self.limit.max(1)).unwrap_or(1);
        (page - 1) * limit
    }

    pub fn sort_direction(&self) -> SortDirection {
        SortDirection::from_sort(&self.sort)
    }
}

/// A query that can be narrowed down to one page.
pub trait PageScope: Sized {
    fn page_offset(self, offset: u64) -> Self;
    fn page_limit(self, limit: u64) -> Self;
    fn page_order(self, column: &str, direction: SortDirection) -> Self;
}

impl<Q> PageScope for Q
where
    Q: QuerySelect + QueryOrder,
{
    fn page_offset(self, offset: u64) -> Self {
        QuerySelect::offset(self, offset)
    }

    fn page_limit(self, limit: u64) -> Self {
        QuerySelect::limit(self, limit)
    }

    fn page_order(self, column: &str, direction: SortDirection) -> Self {
        let expr: SimpleExpr = match column.split_once('.') {
            Some((table, column)) => Expr::col((Alias::new(table), Alias::new(column))).into(),
            None => Expr::col(Alias::new(column)).into(),
        };
        QueryOrder::order_by(self, expr, direction.into())
    }
}

/// Something that knows how many rows the current filter matches.
#[async_trait]
pub trait CountSource: Send + Sized {
    type Error: Send + std::fmt::Display;

    async fn count_rows(self) -> Result<u64, Self::Error>;
}

/// Counts the rows of a sea-orm select on a given connection.
pub struct CountQuery<'db, S, C> {
    select: S,
    db: &'db C,
}

impl<'db, S, C> CountQuery<'db, S, C> {
    pub fn new(select: S, db: &'db C) -> Self {
        Self { select, db }
    }
}

#[async_trait]
impl<'db, S, C> CountSource for CountQuery<'db, S, C>
where
    C: ConnectionTrait,
    S: PaginatorTrait<'db, C> + Send,
{
    type Error = DbErr;

    async fn count_rows(self) -> Result<u64, DbErr> {
        self.select.count(self.db).await
    }
}

/// Pagination state for one request: the normalized request, the computed
/// window and totals, and finally the fetched rows.
///
/// Serializes as `limit`, `page`, `sort`, `order`, `total_rows`,
/// `total_pages` and `rows`. The offset stays internal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginator<T> {
    #[serde(flatten)]
    request: PageRequest,
    #[serde(skip)]
    offset: u64,
    total_rows: u64,
    total_pages: u64,
    rows: Option<T>,
}

impl<T> Default for Paginator<T> {
    fn default() -> Self {
        Self::new(PageRequest::default())
    }
}

impl<T> From<PageRequest> for Paginator<T> {
    fn from(request: PageRequest) -> Self {
        Self::new(request)
    }
}

impl<T> Paginator<T> {
    pub fn new(request: PageRequest) -> Self {
        Self {
            request,
            offset: 0,
            total_rows: 0,
            total_pages: 0,
            rows: None,
        }
    }

    fn normalize(&mut self) {
        self.request.normalize();
        self.offset = self.request.offset();
        debug!(
            "Normalized page request: limit {}, page {}, offset {}, order {} {}",
            self.request.limit,
            self.request.page,
            self.offset,
            self.request.order,
            self.request.sort
        );
    }

    /// Returns a closure that limits, offsets and orders a query.
    ///
    /// The request is normalized first, with the same rules as
    /// [`Paginator::set_total`], so the window does not depend on whether
    /// counting happens before or after this call.
    pub fn scope<Q: PageScope>(&mut self) -> impl Fn(Q) -> Q + Clone {
        self.normalize();
        let offset = self.offset;
        let limit = u64::try_from(self.request.limit).unwrap_or(DEFAULT_LIMIT as u64);
        let column = self.request.order.clone();
        let direction = self.request.sort_direction();
        move |query: Q| {
            query
                .page_offset(offset)
                .page_limit(limit)
                .page_order(&column, direction)
        }
    }

    /// Asks `source` for the total number of rows and updates the totals.
    ///
    /// A failing count source leaves the paginator untouched and its error
    /// is returned as is.
    pub async fn set_count<C: CountSource>(&mut self, source: C) -> Result<(), C::Error> {
        let total = source.count_rows().await.inspect_err(|err| {
            warn!("Counting rows for pagination failed: {}", err);
        })?;
        self.set_total(total);
        Ok(())
    }

    pub fn set_total(&mut self, total: u64) {
        self.normalize();
        let limit = u64::try_from(self.request.limit).unwrap_or(DEFAULT_LIMIT as u64);
        self.total_rows = total;
        self.total_pages = total.div_ceil(limit);
        debug!("{} rows in {} pages", self.total_rows, self.total_pages);
    }

    pub fn paginate(&mut self, rows: T) {
        self.rows = Some(rows);
    }

    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    pub fn limit(&self) -> i32 {
        self.request.limit
    }

    pub fn page(&self) -> i32 {
        self.request.page
    }

    pub fn sort(&self) -> &str {
        &self.request.sort
    }

    pub fn order(&self) -> &str {
        &self.request.order
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.request.sort_direction()
    }

    /// The ordering as a single `"<column> <direction>"` clause.
    pub fn order_expression(&self) -> String {
        format!("{} {}", self.request.order, self.request.sort)
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn total_rows(&self) -> u64 {
        self.total_rows
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn rows(&self) -> Option<&T> {
        self.rows.as_ref()
    }

    pub fn into_rows(self) -> Option<T> {
        self.rows
    }
}
