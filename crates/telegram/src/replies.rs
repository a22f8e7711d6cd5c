//! The fixed Indonesian reply strings. The wording matches the reference
//! storefront and is a domain requirement, not a translation surface.

use warung_core::domain::order::Order;
use warung_core::domain::product::Product;

pub fn welcome(categories: &[String]) -> String {
    if categories.is_empty() {
        return "Selamat datang!\nBelum ada kategori. Hubungi admin.".to_owned();
    }
    format!("Selamat datang!\nKategori tersedia:\n- {}", categories.join("\n- "))
}

pub fn catalog(products: &[Product]) -> String {
    if products.is_empty() {
        return "Katalog masih kosong.".to_owned();
    }

    let lines: Vec<String> = products
        .iter()
        .map(|product| format!("{} | Rp{} | Stok {}", product.name, product.price, product.stock))
        .collect();
    format!("Daftar produk:\n{}", lines.join("\n"))
}

pub fn order_usage() -> &'static str {
    "Gunakan: /order <product_id>"
}

pub fn order_created(order: &Order) -> String {
    format!("Pesanan dibuat. ID: {}.\nSilakan lakukan pembayaran.", order.id.0)
}

pub fn unknown_command() -> &'static str {
    "Perintah tidak dikenali. Coba /katalog."
}
