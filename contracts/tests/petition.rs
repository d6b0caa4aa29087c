use ark_bls12_381::Bls12_381;
use ark_std::{
    rand::{rngs::StdRng, SeedableRng},
    UniformRand,
};
use blake2::Blake2b512;
use chainspace_contracts::{
    Checker, ContractError, Ledger, LedgerError, LedgerObject, Petition, PetitionContract, Rejection,
    SpentTagList, Transaction, Violation, VoteError,
};
use test_utils::{
    authorities::Authorities,
    trustees::{quorums, trustee_setup},
    Fr,
};

type Contract = PetitionContract<Bls12_381, Blake2b512>;

fn options() -> Vec<String> {
    vec!["YES".to_string(), "NO".to_string()]
}

/// Signs `petition` once with a fresh credential per vote, applying every signature.
fn sign_all(
    rng: &mut StdRng,
    ledger: &mut Ledger<Blake2b512>,
    contract: &Contract,
    authorities: &Authorities,
    mut petition: Petition<Bls12_381>,
    mut list: SpentTagList<Bls12_381>,
    votes: &[u64],
) -> (Petition<Bls12_381>, SpentTagList<Bls12_381>) {
    for vote in votes {
        let d = Fr::rand(rng);
        let credential = authorities.issue(&[d], &authorities.signers());
        let (tx, signed, signed_list) = contract
            .sign(rng, &petition, &list, &credential, &d, *vote)
            .unwrap();
        ledger.apply(&tx).unwrap();
        petition = signed;
        list = signed_list;
    }
    (petition, list)
}

#[test]
fn every_quorum_reads_the_same_outcome() {
    let mut rng = StdRng::seed_from_u64(0u64);
    let authorities = Authorities::setup(&mut rng, b"petition", 1, 2, 3);
    let (vote_params, trustees) = trustee_setup(&mut rng, b"petition", 2, 3);
    let contract = Contract::new(authorities.params.clone(), vote_params);
    let mut ledger = Ledger::<Blake2b512>::new();
    ledger.deploy(contract.clone());
    ledger.apply(&contract.init().unwrap()).unwrap();

    let (tx, petition, list) = contract
        .create_petition(
            b"1234",
            options(),
            trustees.trustee_keys.clone(),
            2,
            authorities.verification_key.clone(),
        )
        .unwrap();
    ledger.apply(&tx).unwrap();

    let (signed, list) = sign_all(
        &mut rng,
        &mut ledger,
        &contract,
        &authorities,
        petition,
        list,
        &[1, 1, 1],
    );
    assert_eq!(list.tags.len(), 3);

    for quorum in quorums(2, 3) {
        let mut petition = signed.clone();
        for trustee in &quorum {
            let (tx, tallied) = contract
                .tally(
                    &mut rng,
                    &petition,
                    *trustee,
                    trustees.secret(*trustee).unwrap(),
                    quorum.clone(),
                )
                .unwrap();
            contract.check(&tx).unwrap();
            petition = tallied;
        }
        let (tx, outcome) = contract.read(&petition).unwrap();
        contract.check(&tx).unwrap();
        assert_eq!(
            outcome,
            vec![("YES".to_string(), 3), ("NO".to_string(), 0)]
        );
    }

    // Only one quorum gets to decrypt the petition on the ledger
    let (tx, tallied) = contract
        .tally(&mut rng, &signed, 1, trustees.secret(1).unwrap(), vec![1, 2])
        .unwrap();
    ledger.apply(&tx).unwrap();
    let (tx, _) = contract
        .tally(&mut rng, &signed, 3, trustees.secret(3).unwrap(), vec![1, 3])
        .unwrap();
    assert!(matches!(
        ledger.apply(&tx),
        Err(LedgerError::InactiveInput(_))
    ));
    let (tx, done) = contract
        .tally(&mut rng, &tallied, 2, trustees.secret(2).unwrap(), vec![1, 2])
        .unwrap();
    ledger.apply(&tx).unwrap();
    let (tx, _) = contract.read(&done).unwrap();
    ledger.apply(&tx).unwrap();
}

#[test]
fn a_credential_signs_a_petition_once() {
    let mut rng = StdRng::seed_from_u64(1u64);
    let authorities = Authorities::setup(&mut rng, b"petition", 1, 2, 3);
    let (vote_params, trustees) = trustee_setup(&mut rng, b"petition", 2, 3);
    let contract = Contract::new(authorities.params.clone(), vote_params);
    let mut ledger = Ledger::<Blake2b512>::new();
    ledger.deploy(contract.clone());
    ledger.apply(&contract.init().unwrap()).unwrap();

    let create = |uuid: &[u8]| {
        contract
            .create_petition(
                uuid,
                options(),
                trustees.trustee_keys.clone(),
                2,
                authorities.verification_key.clone(),
            )
            .unwrap()
    };
    let (tx, first, first_list) = create(b"petition-1");
    ledger.apply(&tx).unwrap();
    let (tx, second, second_list) = create(b"petition-2");
    ledger.apply(&tx).unwrap();

    let d = Fr::rand(&mut rng);
    let credential = authorities.issue(&[d], &[2, 3]);
    let (tx, signed, signed_list) = contract
        .sign(&mut rng, &first, &first_list, &credential, &d, 1)
        .unwrap();
    ledger.apply(&tx).unwrap();

    // A randomized credential still gives the same tag
    let randomized = credential.randomize(&mut rng);
    assert_eq!(
        contract
            .sign(&mut rng, &signed, &signed_list, &randomized, &d, 0)
            .unwrap_err(),
        ContractError::Violation(Violation::DoubleUse)
    );
    // and signing another petition gives an unrelated one
    let (tx, _, other_list) = contract
        .sign(&mut rng, &second, &second_list, &randomized, &d, 0)
        .unwrap();
    ledger.apply(&tx).unwrap();
    assert_ne!(other_list.tags[0], signed_list.tags[0]);

    // A vote outside of {0, 1} is refused before reaching the ledger
    let d = Fr::rand(&mut rng);
    let credential = authorities.issue(&[d], &[1, 3]);
    assert_eq!(
        contract
            .sign(&mut rng, &signed, &signed_list, &credential, &d, 2)
            .unwrap_err(),
        ContractError::Vote(VoteError::NotABit(2))
    );
}

#[test]
fn counts_beyond_the_tally_bound_are_unreadable() {
    let mut rng = StdRng::seed_from_u64(2u64);
    let authorities = Authorities::setup(&mut rng, b"petition", 1, 1, 1);
    let (vote_params, trustees) = trustee_setup(&mut rng, b"petition", 1, 1);
    let contract = Contract::new(
        authorities.params.clone(),
        vote_params.with_tally_bound(2),
    );
    let mut ledger = Ledger::<Blake2b512>::new();
    ledger.deploy(contract.clone());
    ledger.apply(&contract.init().unwrap()).unwrap();
    let (tx, petition, list) = contract
        .create_petition(
            b"petition-1",
            options(),
            trustees.trustee_keys.clone(),
            1,
            authorities.verification_key.clone(),
        )
        .unwrap();
    ledger.apply(&tx).unwrap();

    let (signed, _) = sign_all(
        &mut rng,
        &mut ledger,
        &contract,
        &authorities,
        petition,
        list,
        &[1, 0, 1, 1],
    );
    let (tx, done) = contract
        .tally(&mut rng, &signed, 1, trustees.secret(1).unwrap(), vec![1])
        .unwrap();
    ledger.apply(&tx).unwrap();
    assert_eq!(
        contract.read(&done).unwrap_err(),
        ContractError::Vote(VoteError::RangeExceeded { bound: 2 })
    );

    // A read declaring some outcome is rejected as well
    let tx = Transaction::new("petition", "read")
        .with_reference_input(&LedgerObject::from(done))
        .unwrap()
        .with_return(&vec![("YES".to_string(), 3u64), ("NO".to_string(), 1u64)])
        .unwrap();
    assert!(matches!(
        ledger.apply(&tx),
        Err(LedgerError::Rejected {
            reason: Rejection::RangeExceeded { bound: 2 },
            ..
        })
    ));
}
