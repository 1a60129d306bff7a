//! HTML receipt renderer for the keys email.
//!
//! One table-layout template: header with the order date, a hero with a
//! view-order link, order info, one row per cart line with that product's
//! keys, and a support footer. Kept behind the ReceiptRenderer port so the
//! fulfillment core never touches markup.

use crate::domain::checkout::CartItem;
use crate::domain::fulfillment::Order;
use crate::ports::ReceiptRenderer;

/// Renders the receipt/keys email.
pub struct HtmlReceiptRenderer {
    frontend_url: String,
}

impl HtmlReceiptRenderer {
    pub fn new(frontend_url: impl Into<String>) -> Self {
        Self {
            frontend_url: frontend_url.into(),
        }
    }

    fn item_row(&self, item: &CartItem, order: &Order) -> String {
        let keys_html: String = order
            .assigned_keys
            .iter()
            .filter(|key| key.product_id == item.product_id)
            .map(|key| format!(r#"<span style="color:#008000;">{}</span>"#, escape(&key.code)))
            .collect::<Vec<_>>()
            .join("<br/>");

        format!(
            r#"<tr>
  <td style="padding:15px; border-bottom:1px solid #eee;">
    <strong>{title}</strong><br/>
    Quantity: {quantity}<br/>
    Price: ₹{price}<br/>
    Keys:<br/> {keys}
  </td>
</tr>"#,
            title = escape(&item.title),
            quantity = item.quantity,
            price = item.unit_price,
            keys = keys_html,
        )
    }
}

impl ReceiptRenderer for HtmlReceiptRenderer {
    fn render(&self, order: &Order) -> String {
        let order_date = order.created_at.as_datetime().format("%d %B %Y").to_string();
        let items_html: String = order
            .cart
            .iter()
            .map(|item| self.item_row(item, order))
            .collect();

        format!(
            r#"<html>
  <body style="font-family: Arial, sans-serif; background:#ffffff; margin:0; padding:0;">
    <table width="100%" cellpadding="0" cellspacing="0" border="0">
      <tr>
        <td align="center">
          <table width="600" cellpadding="0" cellspacing="0" border="0" style="max-width:600px; margin:0 auto;">

            <!-- Header -->
            <tr>
              <td style="padding:20px; text-align:left; font-weight:bold;">Pixelkeys</td>
              <td style="padding:20px; text-align:right; font-size:12px; color:#555;">{order_date}</td>
            </tr>

            <!-- Hero -->
            <tr>
              <td colspan="2" style="padding:20px; text-align:center;">
                <h2 style="margin:0; font-size:22px; color:#000;">Here are your keys 🎉</h2>
                <p style="font-size:14px; color:#555; line-height:20px;">
                  Thank you for your purchase. Below are your game keys.
                </p>
                <a href="{frontend_url}/orders/{order_id}"
                   style="display:inline-block; padding:12px 24px; background:#000; color:#fff; text-decoration:none; font-weight:bold; border-radius:4px;">
                  View Order
                </a>
              </td>
            </tr>

            <!-- Order Info -->
            <tr>
              <td colspan="2" style="padding:20px; border-top:1px solid #eee; border-bottom:1px solid #eee;">
                <table width="100%">
                  <tr>
                    <td style="font-size:14px; color:#555;">
                      <strong style="color:#000;">Order number</strong><br/> {order_number}
                    </td>
                    <td style="font-size:14px; color:#555; text-align:right;">
                      <strong style="color:#000;">Order date</strong><br/> {order_date}
                    </td>
                  </tr>
                </table>
              </td>
            </tr>

            <!-- Items -->
            {items_html}

            <!-- Footer -->
            <tr>
              <td colspan="2" style="background:#000; color:#fff; padding:20px; font-size:12px; text-align:center;">
                <p style="margin:0;">For support, contact us at
                  <a href="mailto:support@pixelkeys.shop" style="color:#fff;">support@pixelkeys.shop</a>
                </p>
                <p style="margin:10px 0 0;">&copy; 2025 Pixelkeys. All rights reserved.</p>
              </td>
            </tr>

          </table>
        </td>
      </tr>
    </table>
  </body>
</html>"#,
            order_date = order_date,
            frontend_url = self.frontend_url,
            order_id = order.id,
            order_number = escape(&order.order_number),
            items_html = items_html,
        )
    }
}

/// Minimal HTML escaping for text interpolated into the template.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
