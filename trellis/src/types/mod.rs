pub mod attribute;
pub mod form;
pub mod ids;
pub mod object;
pub mod page_info;
pub mod triple;
pub mod value;

pub use attribute::{AttributeDefinition, Cardinality, Identity, ValueKind};
pub use form::{
    Combinator, Condition, Direction, Form, FormConfig, FormError, QueryForm, WhereClause,
    WhereEntry,
};
pub use ids::{AttributeId, EntityId};
pub use object::{Related, ResolvedObject, ResolvedObjects};
pub use page_info::{Cursor, FormattedPageInfo, PageInfo};
pub use triple::{Time, Triple};
pub use value::{Value, ValueError};
