use ark_bls12_381::Bls12_381;
use ark_std::{
    rand::{rngs::StdRng, SeedableRng},
    UniformRand,
};
use blake2::Blake2b512;
use chainspace_contracts::{
    Checker, ContractError, IssuanceContract, Ledger, LedgerError, Rejection, TumblerContract,
    Violation,
};
use coconut::Credential;
use test_utils::{authorities::Authorities, Fr};
use utils::wire::{from_bytes, to_bytes};

type Issuance = IssuanceContract<Bls12_381, Blake2b512>;
type Tumbler = TumblerContract<Bls12_381, Blake2b512>;

struct Deployment {
    ledger: Ledger<Blake2b512>,
    issuance: Issuance,
    tumbler: Tumbler,
    authorities: Authorities,
    coins: Authorities,
}

/// A ledger with credential instances paid for by a tumbler redemption.
fn deploy(rng: &mut StdRng) -> Deployment {
    let authorities = Authorities::setup(rng, b"issuance", 3, 2, 3);
    let coins = Authorities::setup(rng, b"coins", 1, 1, 1);
    let issuance = Issuance::new(authorities.params.clone());
    let tumbler = Tumbler::new(coins.params.clone());
    let mut ledger = Ledger::<Blake2b512>::new();
    ledger.deploy(issuance.clone());
    ledger.deploy(tumbler.clone());
    ledger.apply(&issuance.init().unwrap()).unwrap();
    ledger.apply(&tumbler.init().unwrap()).unwrap();
    Deployment {
        ledger,
        issuance,
        tumbler,
        authorities,
        coins,
    }
}

#[test]
fn requests_collect_partials_into_a_credential() {
    let mut rng = StdRng::seed_from_u64(0u64);
    let Deployment {
        mut ledger,
        issuance,
        tumbler,
        authorities,
        coins,
    } = deploy(&mut rng);

    let (tx, instance) = issuance
        .create(
            3,
            2,
            3,
            "tumbler.redeem",
            authorities.verification_key.clone(),
        )
        .unwrap();
    ledger.apply(&tx).unwrap();
    let (tx, list) = tumbler
        .create_tumbler(b"fees", coins.verification_key.clone())
        .unwrap();
    ledger.apply(&tx).unwrap();

    let coin = Fr::rand(&mut rng);
    let coin_credential = coins.issue(&[coin], &coins.signers());
    let (payment, _) = tumbler
        .redeem(&mut rng, &list, &coin_credential, &coin, b"issuer")
        .unwrap();

    let attributes = vec![Fr::rand(&mut rng), Fr::rand(&mut rng), Fr::from(18u64)];
    let (tx, pending) = issuance
        .request(
            &instance,
            attributes[2..].to_vec(),
            b"blind-request".to_vec(),
            payment.clone(),
        )
        .unwrap();
    let before = ledger.len();
    ledger.apply(&tx).unwrap();
    // The redemption went through with the request
    assert_eq!(ledger.len(), before + 1);
    assert!(matches!(
        ledger.apply(&payment),
        Err(LedgerError::InactiveInput(_))
    ));

    let partial = |id| to_bytes(&authorities.partial(id, &attributes)).unwrap();
    let (tx, first) = issuance.issue(&pending, 2, &partial(3)).unwrap();
    ledger.apply(&tx).unwrap();
    assert!(!first.is_complete());
    assert_eq!(
        issuance.issue(&first, 2, &partial(3)).unwrap_err(),
        ContractError::Violation(Violation::SlotAlreadyFilled(2))
    );
    // Filling the slot again from the consumed version
    let (tx, _) = issuance.issue(&pending, 2, &partial(2)).unwrap();
    assert!(matches!(
        ledger.apply(&tx),
        Err(LedgerError::InactiveInput(_))
    ));
    assert_eq!(
        issuance.issue(&first, 3, &partial(1)).unwrap_err(),
        ContractError::Violation(Violation::SlotOutOfRange(3))
    );

    let (tx, complete) = issuance.issue(&first, 0, &partial(1)).unwrap();
    ledger.apply(&tx).unwrap();
    assert!(complete.is_complete());

    let partials = complete
        .issued
        .iter()
        .enumerate()
        .filter_map(|(i, bytes)| {
            bytes
                .as_ref()
                .map(|bytes| (i as u16 + 1, from_bytes::<Credential<Bls12_381>>(bytes).unwrap()))
        })
        .collect::<Vec<_>>();
    let credential = Credential::aggregate(partials.iter().map(|(id, c)| (*id, c))).unwrap();
    credential
        .verify(&attributes, &instance.verification_key)
        .unwrap();

    let tx = issuance
        .verify(
            &mut rng,
            &instance,
            &credential,
            &attributes[..2],
            &attributes[2..],
        )
        .unwrap();
    ledger.apply(&tx).unwrap();

    // Claiming another public attribute
    let mut tx = tx;
    tx.parameters[0] = utils::wire::to_hex(&vec![Fr::from(21u64)]).unwrap();
    assert!(matches!(
        ledger.apply(&tx),
        Err(LedgerError::Rejected {
            reason: Rejection::ProofInvalid(_),
            ..
        })
    ));
}

#[test]
fn requests_need_the_declared_callback() {
    let mut rng = StdRng::seed_from_u64(1u64);
    let Deployment {
        mut ledger,
        issuance,
        tumbler,
        authorities,
        coins,
    } = deploy(&mut rng);

    let (tx, instance) = issuance
        .create(
            3,
            2,
            3,
            "tumbler.redeem",
            authorities.verification_key.clone(),
        )
        .unwrap();
    ledger.apply(&tx).unwrap();

    let (other, _) = tumbler
        .create_tumbler(b"fees", coins.verification_key.clone())
        .unwrap();
    assert_eq!(
        issuance
            .request(&instance, vec![], b"blind".to_vec(), other.clone())
            .unwrap_err(),
        ContractError::Violation(Violation::CallbackMismatch {
            expected: "tumbler.redeem".to_string(),
            found: "tumbler.create_tumbler".to_string(),
        })
    );

    // Swapping the callback of a well formed request
    let (tx, list) = tumbler
        .create_tumbler(b"fees", coins.verification_key.clone())
        .unwrap();
    ledger.apply(&tx).unwrap();
    let coin = Fr::rand(&mut rng);
    let coin_credential = coins.issue(&[coin], &coins.signers());
    let (payment, _) = tumbler
        .redeem(&mut rng, &list, &coin_credential, &coin, b"issuer")
        .unwrap();
    let (mut tx, _) = issuance
        .request(&instance, vec![], b"blind".to_vec(), payment)
        .unwrap();
    let (other, _) = tumbler
        .create_tumbler(b"other-fees", coins.verification_key.clone())
        .unwrap();
    tx.dependencies[0] = other;
    let before = ledger.len();
    assert!(matches!(
        ledger.apply(&tx),
        Err(LedgerError::Rejected {
            reason: Rejection::Invariant(Violation::CallbackMismatch { .. }),
            ..
        })
    ));
    // Nothing of the bundle is applied
    assert_eq!(ledger.len(), before);
}

#[test]
fn showings_reference_live_instances() {
    let mut rng = StdRng::seed_from_u64(2u64);
    let Deployment {
        mut ledger,
        issuance,
        authorities,
        ..
    } = deploy(&mut rng);

    // Never applied
    let (_, instance) = issuance
        .create(
            3,
            2,
            3,
            "tumbler.redeem",
            authorities.verification_key.clone(),
        )
        .unwrap();
    let attributes = vec![Fr::rand(&mut rng), Fr::rand(&mut rng), Fr::rand(&mut rng)];
    let credential = authorities.issue(&attributes, &[1, 3]);
    let tx = issuance
        .verify(&mut rng, &instance, &credential, &attributes, &[])
        .unwrap();
    assert!(issuance.accepts(&tx));
    assert!(matches!(
        ledger.apply(&tx),
        Err(LedgerError::InactiveReference(_))
    ));
}
