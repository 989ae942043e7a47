use serde_json::{Value, json};
use storesync_domain::EntityResource;
use tracing::warn;

use super::RecordTables;

pub(super) fn seed(tables: &mut RecordTables) {
    let products = [
        json!({
            "nombre": "Laptop",
            "descripcion": "Laptop HP para oficina",
            "precio": 2_500_000,
            "stock": 10,
            "categoria": "Electrónica"
        }),
        json!({
            "nombre": "Mouse inalámbrico",
            "descripcion": null,
            "precio": 50_000,
            "stock": 40,
            "categoria": "Electrónica"
        }),
        json!({
            "nombre": "Camiseta deportiva",
            "descripcion": "Talla M",
            "precio": 45_000.5,
            "stock": 25,
            "categoria": "Deportes"
        }),
        json!({
            "nombre": "Lámpara de escritorio",
            "descripcion": "Luz LED regulable",
            "precio": 89_900,
            "stock": 0,
            "categoria": "Hogar"
        }),
    ];
    let customers = [
        json!({
            "nombre": "Juan Pérez",
            "email": "juan.perez@gmail.com",
            "telefono": "3001234567",
            "documento": "1020304050",
            "ciudad": "Medellín",
            "direccion": "Calle 10 # 43-20"
        }),
        json!({
            "nombre": "Ana Torres",
            "email": "ana.torres@outlook.com",
            "telefono": "3109876543",
            "documento": "52896341",
            "ciudad": "Bogotá",
            "direccion": null
        }),
        json!({
            "nombre": "Carlos Ruiz",
            "email": "cruiz@empresa.co",
            "telefono": "3155550101",
            "documento": "987654",
            "ciudad": "Cali"
        }),
    ];

    insert_all(tables, EntityResource::Products, products);
    insert_all(tables, EntityResource::Customers, customers);

    if let Err(error) = tables.soft_delete(EntityResource::Products, 4) {
        warn!(error = %error, "failed to deactivate demo product");
    }
}

fn insert_all<const N: usize>(
    tables: &mut RecordTables,
    resource: EntityResource,
    records: [Value; N],
) {
    for record in records {
        if let Err(error) = tables.create(resource, record) {
            warn!(resource = resource.as_str(), error = %error, "failed to seed demo record");
        }
    }
}
