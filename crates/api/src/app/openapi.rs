use utoipa::OpenApi;

use crate::app::dto::{
    CategoriaResponse, CreateCategoriaRequest, CreateProdutoRequest, ErrorResponse, ProdutoResponse,
    UpdateCategoriaRequest, UpdateProdutoRequest,
};
use crate::app::routes::{categoria, produto};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalogo API",
        description = "Categorias e produtos do catalogo."
    ),
    paths(
        categoria::list_categorias,
        categoria::create_categoria,
        categoria::get_categoria,
        categoria::update_categoria,
        categoria::delete_categoria,
        produto::list_produtos,
        produto::create_produto,
        produto::get_produto,
        produto::update_produto,
        produto::delete_produto,
    ),
    components(schemas(
        CreateCategoriaRequest,
        UpdateCategoriaRequest,
        CategoriaResponse,
        CreateProdutoRequest,
        UpdateProdutoRequest,
        ProdutoResponse,
        ErrorResponse,
    )),
    tags(
        (name = "categoria", description = "Product categories"),
        (name = "produto", description = "Products, optionally linked to a categoria")
    )
)]
pub struct ApiDoc;
