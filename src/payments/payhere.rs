use anyhow::{Result, bail};
use md5::{Digest, Md5};

use crate::{
    config::config_model::PayHereConfig,
    domain::value_objects::subscriptions::PayHereNotification,
};

/// Computes and checks PayHere's double MD5 signatures.
///
/// The merchant secret is never used directly: both sides hash it first and mix
/// the uppercase hex digest into the signed string.
pub struct PayHereSigner {
    merchant_id: String,
    hashed_secret: String,
}

impl PayHereSigner {
    pub fn new(merchant_id: impl Into<String>, merchant_secret: &str) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            hashed_secret: md5_upper_hex(merchant_secret),
        }
    }

    pub fn from_config(config: &PayHereConfig) -> Self {
        Self::new(config.merchant_id.clone(), &config.merchant_secret)
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    /// Hash sent with the checkout form. `amount` must already be formatted with two decimals.
    pub fn checkout_hash(&self, order_id: &str, amount: &str, currency: &str) -> String {
        md5_upper_hex(&format!(
            "{}{}{}{}{}",
            self.merchant_id, order_id, amount, currency, self.hashed_secret
        ))
    }

    /// Signature PayHere puts in `md5sig`. Fields are taken exactly as received.
    pub fn notification_signature(
        &self,
        order_id: &str,
        amount: &str,
        currency: &str,
        status_code: i32,
    ) -> String {
        md5_upper_hex(&format!(
            "{}{}{}{}{}{}",
            self.merchant_id, order_id, amount, currency, status_code, self.hashed_secret
        ))
    }

    /// Checks that the notification was produced by someone holding the merchant secret.
    pub fn verify_notification(&self, notification: &PayHereNotification) -> Result<()> {
        if notification.merchant_id != self.merchant_id {
            bail!("merchant id mismatch");
        }

        let expected = self.notification_signature(
            &notification.order_id,
            &notification.payhere_amount,
            &notification.payhere_currency,
            notification.status_code,
        );
        let expected = hex::decode(expected)?;
        let provided = hex::decode(notification.md5sig.trim())?;

        if expected[..] != provided[..] {
            bail!("invalid notification signature");
        }

        Ok(())
    }
}

fn md5_upper_hex(input: &str) -> String {
    hex::encode_upper(Md5::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MERCHANT_ID: &str = "1211149";
    const SECRET: &str = "merchant-secret";
    const ORDER_ID: &str = "ORDER_1700000000000_ab12cd34";

    fn signer() -> PayHereSigner {
        PayHereSigner::new(MERCHANT_ID, SECRET)
    }

    fn notification(amount: &str, currency: &str, status_code: i32, sig: &str) -> PayHereNotification {
        PayHereNotification {
            merchant_id: MERCHANT_ID.to_string(),
            order_id: ORDER_ID.to_string(),
            payment_id: Some("320025071278".to_string()),
            payhere_amount: amount.to_string(),
            payhere_currency: currency.to_string(),
            status_code,
            md5sig: sig.to_string(),
            custom_1: None,
            custom_2: None,
            status_message: Some("Successfully completed the payment.".to_string()),
            method: Some("VISA".to_string()),
        }
    }

    #[test]
    fn hashes_the_secret_once_in_uppercase() {
        assert_eq!(signer().hashed_secret, "98532A5713B020CFE966902199C9E591");
    }

    #[test]
    fn checkout_hash_matches_reference_vector() {
        assert_eq!(
            signer().checkout_hash(ORDER_ID, "1500.00", "LKR"),
            "148440B8432E04B597A4F54CC35D9741"
        );
    }

    #[test]
    fn checkout_hash_is_deterministic() {
        let a = signer().checkout_hash(ORDER_ID, "1500.00", "LKR");
        let b = PayHereSigner::new(MERCHANT_ID, SECRET).checkout_hash(ORDER_ID, "1500.00", "LKR");
        assert_eq!(a, b);
    }

    #[test]
    fn notification_signature_matches_reference_vectors() {
        assert_eq!(
            signer().notification_signature(ORDER_ID, "1500.00", "LKR", 2),
            "F79FA7BB55373DAE9D13020A67BD9181"
        );
        assert_eq!(
            signer().notification_signature(ORDER_ID, "1500.00", "LKR", -2),
            "C6FFEE772342EC9D071D8E249F8AE7B3"
        );
    }

    #[test]
    fn accepts_genuine_notification() {
        let n = notification("1500.00", "LKR", 2, "F79FA7BB55373DAE9D13020A67BD9181");
        assert!(signer().verify_notification(&n).is_ok());
    }

    #[test]
    fn accepts_lowercase_hex_signature() {
        let n = notification("1500.00", "LKR", 2, "f79fa7bb55373dae9d13020a67bd9181");
        assert!(signer().verify_notification(&n).is_ok());
    }

    #[test]
    fn rejects_tampered_amount() {
        let n = notification("15.00", "LKR", 2, "F79FA7BB55373DAE9D13020A67BD9181");
        assert!(signer().verify_notification(&n).is_err());
    }

    #[test]
    fn rejects_tampered_currency() {
        let n = notification("1500.00", "USD", 2, "F79FA7BB55373DAE9D13020A67BD9181");
        assert!(signer().verify_notification(&n).is_err());
    }

    #[test]
    fn rejects_tampered_status_code() {
        // Signature was issued for a failed payment (-2); flipping to success must fail.
        let n = notification("1500.00", "LKR", 2, "C6FFEE772342EC9D071D8E249F8AE7B3");
        assert!(signer().verify_notification(&n).is_err());
    }

    #[test]
    fn rejects_foreign_merchant() {
        let mut n = notification("1500.00", "LKR", 2, "F79FA7BB55373DAE9D13020A67BD9181");
        n.merchant_id = "9999999".to_string();
        assert!(signer().verify_notification(&n).is_err());
    }

    #[test]
    fn rejects_garbage_signature() {
        let n = notification("1500.00", "LKR", 2, "not-a-hash");
        assert!(signer().verify_notification(&n).is_err());
    }
}
