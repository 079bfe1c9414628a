//! Simple test to verify the rPGP engine works end to end through the orchestrator

#[cfg(test)]
mod tests {
    use crate::core::key_source::{PastedKey, SplitKeySource};
    use crate::core::orchestrator::Orchestrator;
    use crate::crypto::passphrase::{PassphraseField, PassphraseHandle};
    use crate::crypto::pgp::RpgpEngine;
    use crate::model::{Classification, KeyRole, Verification};
    use anyhow::Result;

    #[tokio::test]
    async fn test_rpgp_engine() -> Result<()> {
        println!("Testing rPGP engine...");

        // 1. Generate a key pair
        println!("  1. Generating RSA-2048 keypair...");
        let generator = Orchestrator::new(RpgpEngine::new(), PastedKey::empty())
            .with_key_strength(2048);
        let mut field = PassphraseField::new("smoke-test-pass");
        let keys = generator
            .generate("Smoke Test", "smoke@example.org", PassphraseHandle::take(&mut field)?)
            .await?;
        assert!(field.is_cleared());
        assert_eq!(keys.public.classification(), Classification::PublicKey);
        assert_eq!(keys.private.classification(), Classification::PrivateKey);

        let orch = Orchestrator::new(
            RpgpEngine::new(),
            SplitKeySource::new(
                PastedKey::new(keys.public.text()),
                PastedKey::new(keys.private.text()),
            ),
        );

        // 2. Encrypt and decrypt
        println!("  2. Testing encrypt/decrypt...");
        let armored = orch.encrypt("Hello, workbench!").await?;
        let mut field = PassphraseField::new("smoke-test-pass");
        let plain = orch
            .decrypt(&armored, PassphraseHandle::take(&mut field)?)
            .await?;
        assert_eq!(plain, "Hello, workbench!");

        // 3. Sign and verify
        println!("  3. Testing sign/verify...");
        let mut field = PassphraseField::new("smoke-test-pass");
        let signed = orch
            .sign("Signed text", PassphraseHandle::take(&mut field)?)
            .await?;
        let verification = orch.verify(&signed).await?;
        let info = orch.inspect_key(KeyRole::Public).await?;
        assert_eq!(
            verification,
            Verification::Valid {
                signer_id: info.key_id.clone()
            }
        );
        assert_eq!(info.user_ids, vec!["Smoke Test <smoke@example.org>"]);

        println!("All engine checks passed");
        Ok(())
    }
}
