mod common;

use common::{burn_action, fail_action, send_action, user, TestApp};
use escrow_core::{EscrowError, ErrorKind, Phase, EVENT_PROPOSAL_SUBMITTED};

#[test]
fn test_create_submit_exec_scenario() {
    let mut app = TestApp::new();
    let creator = user(1);
    let executor = user(2);

    let a1 = app.create_agent(&creator).result.unwrap();
    let a2 = app.create_agent(&creator).result.unwrap();
    assert_ne!(a1, a2);
    assert!(app.keeper.has_agent(&app.store, &a1, &creator).is_ok());
    assert!(app.keeper.has_agent(&app.store, &a1, &executor).is_err());

    let id = app.submit(&creator, &a1, vec![], vec![]).result.unwrap();
    assert_eq!(id, 1);
    assert!(app.keeper.has_agent(&app.store, &a1, &creator).is_err());

    let proposal = app.keeper.get_proposal(&app.store, 1).unwrap();
    assert_eq!(proposal.proposer, creator);
    assert_eq!(proposal.agent, a1);

    app.exec(1, &executor, &a1, vec![]).result.unwrap();
    let err = app.keeper.get_proposal(&app.store, 1).unwrap_err();
    assert!(matches!(err, EscrowError::ProposalNotFound { id: 1 }));

    // a2 is untouched by all of this
    assert!(app.keeper.has_agent(&app.store, &a2, &creator).is_ok());
    assert!(app.keeper.check_invariants(&app.store).is_ok());
}

#[test]
fn test_escrowed_swap() {
    let mut app = TestApp::new();
    let alice = user(1);
    let bob = user(2);
    app.fund(&alice, 100);
    app.fund(&bob, 50);

    let agent = app.create_agent(&alice).result.unwrap();

    // alice parks 100 with the agent and asks for 50 in return
    let outcome = app.submit(
        &alice,
        &agent,
        vec![send_action(&alice, &agent, 100)],
        vec![send_action(&agent, &bob, 100)],
    );
    let id = outcome.result.unwrap();
    assert!(outcome
        .events
        .iter()
        .any(|e| e.kind == EVENT_PROPOSAL_SUBMITTED));
    assert_eq!(app.balance(&agent), 100);
    assert_eq!(app.balance(&alice), 0);

    // bob pays alice, then the agent releases to bob
    let outcome = app.exec(id, &bob, &agent, vec![send_action(&bob, &alice, 50)]);
    outcome.result.unwrap();
    let transfers: Vec<_> = outcome
        .events
        .iter()
        .filter(|e| e.kind == "transfer")
        .collect();
    assert_eq!(transfers.len(), 2);
    // executor actions come before post-actions
    assert_eq!(transfers[0].get("from"), Some(bob.to_hex().as_str()));
    assert_eq!(transfers[1].get("from"), Some(agent.to_hex().as_str()));

    assert_eq!(app.balance(&alice), 50);
    assert_eq!(app.balance(&bob), 100);
    assert_eq!(app.balance(&agent), 0);
}

#[test]
fn test_failed_post_action_keeps_proposal() {
    let mut app = TestApp::new();
    let alice = user(1);
    let bob = user(2);
    app.fund(&alice, 10);
    app.fund(&bob, 10);

    let agent = app.create_agent(&alice).result.unwrap();
    // post-action asks the agent for more than it will ever hold
    let id = app
        .submit(&alice, &agent, vec![], vec![send_action(&agent, &bob, 5)])
        .result
        .unwrap();
    let before = app.store.clone();

    let outcome = app.exec(id, &bob, &agent, vec![send_action(&bob, &alice, 3)]);
    let err = outcome.result.unwrap_err();
    assert_eq!(err.action_position(), Some((Phase::PostActions, 0)));
    assert_eq!(err.kind(), ErrorKind::Execution);
    assert!(err.to_string().contains("insufficient funds"));
    assert!(outcome.events.is_empty());
    // bob's own transfer was rolled back too
    assert_eq!(app.store, before);

    // fund the agent and retry the same request
    app.fund(&agent, 5);
    app.exec(id, &bob, &agent, vec![send_action(&bob, &alice, 3)])
        .result
        .unwrap();
    assert_eq!(app.balance(&bob), 12);
    assert_eq!(app.balance(&alice), 13);
}

#[test]
fn test_failed_pre_action_leaves_no_trace() {
    let mut app = TestApp::new();
    let alice = user(1);
    app.fund(&alice, 10);
    let agent = app.create_agent(&alice).result.unwrap();
    let before = app.store.clone();

    let outcome = app.submit(
        &alice,
        &agent,
        vec![send_action(&alice, &agent, 10), fail_action(&alice, "nope")],
        vec![],
    );
    let err = outcome.result.unwrap_err();
    assert_eq!(err.to_string(), "pre_actions[1]: nope");
    assert_eq!(app.store, before);

    // the agent is still usable and the id was not burned
    let id = app.submit(&alice, &agent, vec![], vec![]).result.unwrap();
    assert_eq!(id, 1);
}

#[test]
fn test_unrouted_action_fails_at_execution() {
    let mut app = TestApp::new();
    let alice = user(1);
    let agent = app.create_agent(&alice).result.unwrap();

    // decodable, so it passes the signer check
    let err = app
        .submit(&alice, &agent, vec![burn_action(&alice, 1)], vec![])
        .result
        .unwrap_err();
    assert_eq!(err.error_code(), "NO_HANDLER");
    assert_eq!(err.action_position(), Some((Phase::PreActions, 0)));
}

#[test]
fn test_proposal_executes_once() {
    let mut app = TestApp::new();
    let alice = user(1);
    let agent = app.create_agent(&alice).result.unwrap();
    let id = app.submit(&alice, &agent, vec![], vec![]).result.unwrap();

    app.exec(id, &user(2), &agent, vec![]).result.unwrap();
    let err = app.exec(id, &user(2), &agent, vec![]).result.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_consumed_agent_cannot_back_second_proposal() {
    let mut app = TestApp::new();
    let alice = user(1);
    let agent = app.create_agent(&alice).result.unwrap();
    app.submit(&alice, &agent, vec![], vec![]).result.unwrap();

    let before = app.store.clone();
    let err = app.submit(&alice, &agent, vec![], vec![]).result.unwrap_err();
    assert!(matches!(err, EscrowError::AgentNotFound { .. }));
    assert_eq!(app.store, before);
}
