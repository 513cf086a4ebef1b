use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, ActiveValue::NotSet};

use crate::{
    audit,
    dto::customers::{CreateCustomerRequest, CustomerList},
    entity::customers::{ActiveModel, Column, Entity as Customers, Model as CustomerModel},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Customer,
    response::ActionResponse,
    services::{optional_text, required_text},
    state::AppState,
};

pub async fn list_customers(state: &AppState) -> AppResult<CustomerList> {
    let items = Customers::find()
        .order_by_asc(Column::Name)
        .order_by_asc(Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(customer_from_entity)
        .collect();
    Ok(CustomerList { items })
}

pub async fn create_customer(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCustomerRequest,
) -> AppResult<ActionResponse> {
    let name = required_text(payload.name, "name")?;

    let customer = ActiveModel {
        id: NotSet,
        name: Set(name),
        email: Set(optional_text(payload.email)),
        phone: Set(optional_text(payload.phone)),
        address: Set(optional_text(payload.address)),
        created_date: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(customer_id = customer.id, admin_id = user.admin_id, "customer created");
    audit::record(
        &state.pool,
        Some(user.admin_id),
        "customer_create",
        "customers",
        serde_json::json!({ "customer_id": customer.id }),
    )
    .await;

    Ok(ActionResponse::created("Customer added successfully", customer.id))
}

fn customer_from_entity(model: CustomerModel) -> Customer {
    Customer {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        address: model.address,
    }
}
