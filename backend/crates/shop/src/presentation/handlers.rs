//! HTTP Handlers

use std::sync::Arc;

use auth::AuthenticatedUser;
use axum::extract::{FromRequest, Multipart, Path, Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use kernel::error::app_error::AppError;
use kernel::extract::Json;
use kernel::hypermedia::{BaseUrl, Envelope, Link, Message};
use kernel::id::{OrderId, ProductId};
use serde_json::{Value, json};

use crate::application::config::ShopConfig;
use crate::application::{
    CreateProductInput, CreateProductUseCase, DeleteOrderUseCase, DeleteProductUseCase,
    OrderQueries, PlaceOrderInput, PlaceOrderUseCase, ProductQueries, UpdateProductUseCase,
};
use crate::domain::entity::product::Product;
use crate::domain::repository::{ImageStore, OrderRepository, ProductRepository};
use crate::domain::value_object::image::ImageUpload;
use crate::error::{ShopError, ShopResult};
use crate::presentation::dto::{
    CreateOrderRequest, CreateProductRequest, CreatedOrderDto, CreatedOrderResponse,
    CreatedProductResponse, OrderListResponse, OrderViewDto, PatchOperationDto, ProductDto,
    ProductListResponse,
};

/// Shared state for shop handlers
pub struct ShopAppState<R, I>
where
    R: ProductRepository + OrderRepository + Send + Sync + 'static,
    I: ImageStore + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub images: Arc<I>,
    pub config: Arc<ShopConfig>,
}

impl<R, I> Clone for ShopAppState<R, I>
where
    R: ProductRepository + OrderRepository + Send + Sync + 'static,
    I: ImageStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            images: self.images.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R, I> ShopAppState<R, I>
where
    R: ProductRepository + OrderRepository + Send + Sync + 'static,
    I: ImageStore + Send + Sync + 'static,
{
    pub fn new(repo: R, images: I, config: ShopConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            images: Arc::new(images),
            config: Arc::new(config),
        }
    }
}

// ============================================================================
// Links
// ============================================================================

fn product_href(base: &BaseUrl, product_id: &ProductId) -> String {
    base.join(&["products", &product_id.to_string()])
}

fn order_href(base: &BaseUrl, order_id: &OrderId) -> String {
    base.join(&["orders", &order_id.to_string()])
}

fn create_product_link(base: &BaseUrl) -> Link {
    Link::post("create_product", base.join(&["products"]))
        .with_description("Create a new product")
        .with_body(json!({ "name": "String", "price": "Number", "productImage": "Image" }))
}

fn create_order_link(base: &BaseUrl) -> Link {
    Link::post("create_order", base.join(&["orders"]))
        .with_description("Create a new order")
        .with_body(json!({ "productId": "ID", "quantity": "Number" }))
}

// ============================================================================
// Products
// ============================================================================

/// GET /products
pub async fn list_products<R, I>(
    State(state): State<ShopAppState<R, I>>,
) -> ShopResult<Json<ProductListResponse>>
where
    R: ProductRepository + OrderRepository + Send + Sync + 'static,
    I: ImageStore + Send + Sync + 'static,
{
    let products = ProductQueries::new(state.repo.clone()).list().await?;
    let base = &state.config.base_url;

    let products: Vec<_> = products
        .iter()
        .map(|p| {
            Envelope::new(ProductDto::summary(p))
                .link(Link::get("self", product_href(base, &p.product_id)))
        })
        .collect();

    Ok(Json(ProductListResponse {
        count: products.len(),
        products,
    }))
}

/// POST /products
///
/// Takes `multipart/form-data` (`name`, `price`, optional `productImage`
/// file) or a JSON body without an image.
pub async fn create_product<R, I>(
    State(state): State<ShopAppState<R, I>>,
    req: Request,
) -> ShopResult<(StatusCode, Json<CreatedProductResponse>)>
where
    R: ProductRepository + OrderRepository + Send + Sync + 'static,
    I: ImageStore + Send + Sync + 'static,
{
    let input = if is_multipart(req.headers()) {
        let multipart = Multipart::from_request(req, &())
            .await
            .map_err(AppError::from)?;
        read_product_form(multipart, state.config.max_image_bytes).await?
    } else {
        let Json(body) = Json::<CreateProductRequest>::from_request(req, &()).await?;
        CreateProductInput {
            name: body.name,
            price: body.price,
            image: None,
        }
    };

    let use_case = CreateProductUseCase::new(
        state.repo.clone(),
        state.images.clone(),
        state.config.clone(),
    );
    let product = use_case.execute(input).await?;

    let created_product = Envelope::new(ProductDto::summary(&product)).link(Link::get(
        "self",
        product_href(&state.config.base_url, &product.product_id),
    ));

    Ok((
        StatusCode::CREATED,
        Json(CreatedProductResponse {
            message: "Created product successfully",
            created_product,
        }),
    ))
}

/// GET /products/{product_id}
pub async fn get_product<R, I>(
    State(state): State<ShopAppState<R, I>>,
    Path(product_id): Path<String>,
) -> ShopResult<Json<Envelope<ProductDto>>>
where
    R: ProductRepository + OrderRepository + Send + Sync + 'static,
    I: ImageStore + Send + Sync + 'static,
{
    let product_id = ProductId::parse(&product_id).ok_or(ShopError::NoValidEntry)?;
    let product = ProductQueries::new(state.repo.clone())
        .get(product_id)
        .await?;

    Ok(Json(product_envelope(&state.config.base_url, product)))
}

fn product_envelope(base: &BaseUrl, product: Product) -> Envelope<ProductDto> {
    let mut links = vec![
        Link::get("self", product_href(base, &product.product_id)),
        Link::get("list", base.join(&["products"])).with_description("Get all products"),
    ];
    if let Some(path) = &product.image_path {
        links.push(Link::get("image", base.join(&[path])));
    }

    let mut envelope = Envelope::new(ProductDto::detail(product));
    envelope.links = links;
    envelope
}

/// PATCH /products/{product_id}
///
/// Body: `[{"propName": "price", "value": 12.5}, ...]`
pub async fn update_product<R, I>(
    State(state): State<ShopAppState<R, I>>,
    Path(product_id): Path<String>,
    Json(operations): Json<Vec<PatchOperationDto>>,
) -> ShopResult<Json<Envelope<Message>>>
where
    R: ProductRepository + OrderRepository + Send + Sync + 'static,
    I: ImageStore + Send + Sync + 'static,
{
    let product_id = ProductId::parse(&product_id).ok_or(ShopError::ProductNotFound)?;
    let operations = operations
        .into_iter()
        .map(|op| (op.prop_name, op.value))
        .collect();

    UpdateProductUseCase::new(state.repo.clone())
        .execute(product_id, operations)
        .await?;

    let body = Message::envelope("Product updated").link(Link::get(
        "self",
        product_href(&state.config.base_url, &product_id),
    ));

    Ok(Json(body))
}

/// DELETE /products/{product_id}
pub async fn delete_product<R, I>(
    State(state): State<ShopAppState<R, I>>,
    Path(product_id): Path<String>,
) -> ShopResult<Json<Envelope<Message>>>
where
    R: ProductRepository + OrderRepository + Send + Sync + 'static,
    I: ImageStore + Send + Sync + 'static,
{
    let product_id = ProductId::parse(&product_id).ok_or(ShopError::ProductNotFound)?;

    DeleteProductUseCase::new(state.repo.clone(), state.images.clone())
        .execute(product_id)
        .await?;

    let body =
        Message::envelope("Product deleted").link(create_product_link(&state.config.base_url));

    Ok(Json(body))
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

/// Read `name`, `price` and `productImage` from a form. The file is read in
/// chunks and abandoned as soon as it passes `max_image_bytes`. An empty
/// file part counts as no image.
async fn read_product_form(
    mut multipart: Multipart,
    max_image_bytes: usize,
) -> ShopResult<CreateProductInput> {
    let mut input = CreateProductInput {
        name: None,
        price: None,
        image: None,
    };

    while let Some(mut field) = multipart.next_field().await.map_err(AppError::from)? {
        let field_name = field.name().unwrap_or_default().to_string();

        match field_name.as_str() {
            "name" => {
                input.name = Some(field.text().await.map_err(AppError::from)?);
            }
            "price" => {
                input.price = Some(Value::String(field.text().await.map_err(AppError::from)?));
            }
            "productImage" => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                let mut bytes = Vec::new();
                while let Some(chunk) = field.chunk().await.map_err(AppError::from)? {
                    if bytes.len() + chunk.len() > max_image_bytes {
                        return Err(ShopError::validation(format!(
                            "Image is larger than {max_image_bytes} bytes"
                        )));
                    }
                    bytes.extend_from_slice(&chunk);
                }

                if !bytes.is_empty() {
                    input.image = Some(ImageUpload::new(file_name, content_type, bytes));
                }
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown form field");
            }
        }
    }

    Ok(input)
}

// ============================================================================
// Orders
// ============================================================================

/// GET /orders
pub async fn list_orders<R, I>(
    State(state): State<ShopAppState<R, I>>,
) -> ShopResult<Json<OrderListResponse>>
where
    R: ProductRepository + OrderRepository + Send + Sync + 'static,
    I: ImageStore + Send + Sync + 'static,
{
    let views = OrderQueries::new(state.repo.clone()).list().await?;
    let base = &state.config.base_url;

    let orders: Vec<_> = views
        .into_iter()
        .map(|view| {
            let href = order_href(base, &view.order_id);
            Envelope::new(OrderViewDto::from(view)).link(Link::get("self", href))
        })
        .collect();

    Ok(Json(OrderListResponse {
        count: orders.len(),
        orders,
    }))
}

/// POST /orders
pub async fn place_order<R, I>(
    State(state): State<ShopAppState<R, I>>,
    user: AuthenticatedUser,
    Json(req): Json<CreateOrderRequest>,
) -> ShopResult<(StatusCode, Json<CreatedOrderResponse>)>
where
    R: ProductRepository + OrderRepository + Send + Sync + 'static,
    I: ImageStore + Send + Sync + 'static,
{
    let order = PlaceOrderUseCase::new(state.repo.clone())
        .execute(PlaceOrderInput {
            product_id: req.product_id,
            quantity: req.quantity,
            placed_by: Some(user.user_id),
        })
        .await?;

    let created_order = Envelope::new(CreatedOrderDto::from(&order)).link(Link::get(
        "self",
        order_href(&state.config.base_url, &order.order_id),
    ));

    Ok((
        StatusCode::CREATED,
        Json(CreatedOrderResponse {
            message: "Order stored",
            created_order,
        }),
    ))
}

/// GET /orders/{order_id}
pub async fn get_order<R, I>(
    State(state): State<ShopAppState<R, I>>,
    Path(order_id): Path<String>,
) -> ShopResult<Json<Envelope<OrderViewDto>>>
where
    R: ProductRepository + OrderRepository + Send + Sync + 'static,
    I: ImageStore + Send + Sync + 'static,
{
    let order_id = OrderId::parse(&order_id).ok_or(ShopError::OrderNotFound)?;
    let view = OrderQueries::new(state.repo.clone()).get(order_id).await?;
    let base = &state.config.base_url;

    let body = Envelope::new(OrderViewDto::from(view))
        .link(Link::get("self", order_href(base, &order_id)))
        .link(Link::get("list", base.join(&["orders"])).with_description("Get all orders"));

    Ok(Json(body))
}

/// DELETE /orders/{order_id}
pub async fn delete_order<R, I>(
    State(state): State<ShopAppState<R, I>>,
    Path(order_id): Path<String>,
) -> ShopResult<Json<Envelope<Message>>>
where
    R: ProductRepository + OrderRepository + Send + Sync + 'static,
    I: ImageStore + Send + Sync + 'static,
{
    let order_id = OrderId::parse(&order_id).ok_or(ShopError::OrderNotFound)?;

    DeleteOrderUseCase::new(state.repo.clone())
        .execute(order_id)
        .await?;

    let body = Message::envelope("Order deleted").link(create_order_link(&state.config.base_url));

    Ok(Json(body))
}
