//! Behaviour every storage backend must share

use common::{
    models::{
        Amenity, City, EntityKind, NewAmenity, NewCity, NewPlace, NewReview, NewState, NewUser,
        Place, Review, State, UpdateState, User,
    },
    storage::Storage,
};
use std::sync::Arc;

pub async fn create_then_get_round_trips(storage: &Arc<dyn Storage>) {
    let state = storage
        .persist(State::new(NewState {
            name: "California".to_string(),
        }))
        .await
        .unwrap();

    let fetched: State = storage.find(&state.id).await.unwrap().unwrap();
    assert_eq!(fetched, state);

    let missing: Option<State> = storage.find("no-such-id").await.unwrap();
    assert!(missing.is_none());

    // Same id under another kind is not a match
    let wrong_kind: Option<City> = storage.find(&state.id).await.unwrap();
    assert!(wrong_kind.is_none());
}

pub async fn delete_then_get_is_not_found(storage: &Arc<dyn Storage>) {
    let amenity = storage
        .persist(Amenity::new(NewAmenity {
            name: "Pool".to_string(),
        }))
        .await
        .unwrap();

    assert!(storage.remove(&amenity).await.unwrap());
    assert!(storage.find::<Amenity>(&amenity.id).await.unwrap().is_none());
    assert!(!storage.remove(&amenity).await.unwrap());
}

pub async fn count_tracks_creates_and_deletes(storage: &Arc<dyn Storage>) {
    let before_states = storage.count(Some(EntityKind::State)).await.unwrap();
    let before_all = storage.count(None).await.unwrap();

    let mut created = Vec::new();
    for name in ["Alabama", "Arizona", "Arkansas", "Colorado"] {
        let state = storage
            .persist(State::new(NewState {
                name: name.to_string(),
            }))
            .await
            .unwrap();
        created.push(state);
    }
    storage
        .persist(Amenity::new(NewAmenity {
            name: "Wifi".to_string(),
        }))
        .await
        .unwrap();

    for state in &created[..2] {
        storage.remove(state).await.unwrap();
    }

    assert_eq!(
        storage.count(Some(EntityKind::State)).await.unwrap(),
        before_states + 2
    );
    assert_eq!(storage.count(None).await.unwrap(), before_all + 3);

    let states = storage.list::<State>().await.unwrap();
    assert!(states.iter().any(|s| s.id == created[3].id));
    assert!(!states.iter().any(|s| s.id == created[0].id));
}

pub async fn save_refreshes_updated_at(storage: &Arc<dyn Storage>) {
    let state = storage
        .persist(State::new(NewState {
            name: "Ohio".to_string(),
        }))
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    let mut edited = state.clone();
    edited.apply(UpdateState {
        name: Some("Iowa".to_string()),
    });
    let saved = storage.persist(edited).await.unwrap();

    assert_eq!(saved.created_at, state.created_at);
    assert!(saved.updated_at > state.updated_at);

    let fetched: State = storage.find(&state.id).await.unwrap().unwrap();
    assert_eq!(fetched.name, "Iowa");
    assert_eq!(fetched.updated_at, saved.updated_at);
}

pub async fn relationships_follow_foreign_keys(storage: &Arc<dyn Storage>) {
    let state = storage
        .persist(State::new(NewState {
            name: "Utah".to_string(),
        }))
        .await
        .unwrap();
    let other_state = storage
        .persist(State::new(NewState {
            name: "Idaho".to_string(),
        }))
        .await
        .unwrap();
    let city = storage
        .persist(City::new(
            &state.id,
            NewCity {
                name: "Provo".to_string(),
            },
        ))
        .await
        .unwrap();
    storage
        .persist(City::new(
            &other_state.id,
            NewCity {
                name: "Boise".to_string(),
            },
        ))
        .await
        .unwrap();
    let user = storage
        .persist(
            User::new(NewUser {
                email: "host@example.com".to_string(),
                password: "secret".to_string(),
                ..Default::default()
            })
            .unwrap(),
        )
        .await
        .unwrap();
    let place = storage
        .persist(Place::new(
            &city.id,
            NewPlace {
                user_id: user.id.clone(),
                name: "Canyon House".to_string(),
                number_rooms: 3,
                latitude: 40.23,
                ..Default::default()
            },
        ))
        .await
        .unwrap();
    let review = storage
        .persist(Review::new(
            &place.id,
            NewReview {
                user_id: user.id.clone(),
                text: "Great view".to_string(),
            },
        ))
        .await
        .unwrap();

    let cities = storage.cities_of(&state.id).await.unwrap();
    assert_eq!(cities, vec![city.clone()]);

    let places = storage.places_of(&city.id).await.unwrap();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].name, "Canyon House");
    assert_eq!(places[0].number_rooms, 3);

    let reviews = storage.reviews_of(&place.id).await.unwrap();
    assert_eq!(reviews, vec![review]);

    let stored_user: User = storage.find(&user.id).await.unwrap().unwrap();
    assert!(stored_user.verify_password("secret"));

    // No cascade: the city outlives its state
    storage.remove(&state).await.unwrap();
    assert!(storage.find::<City>(&city.id).await.unwrap().is_some());
}

pub async fn amenity_links_are_unique(storage: &Arc<dyn Storage>) {
    let place = storage
        .persist(Place::new(
            "city",
            NewPlace {
                user_id: "user".to_string(),
                name: "Studio".to_string(),
                ..Default::default()
            },
        ))
        .await
        .unwrap();
    let wifi = storage
        .persist(Amenity::new(NewAmenity {
            name: "Wifi".to_string(),
        }))
        .await
        .unwrap();
    let oven = storage
        .persist(Amenity::new(NewAmenity {
            name: "Oven".to_string(),
        }))
        .await
        .unwrap();

    assert!(storage.add_amenity(&place.id, &wifi.id).await.unwrap());
    assert!(!storage.add_amenity(&place.id, &wifi.id).await.unwrap());
    assert!(storage.add_amenity(&place.id, &oven.id).await.unwrap());

    let mut names: Vec<String> = storage
        .amenities_of(&place.id)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["Oven", "Wifi"]);

    let stored: Place = storage.find(&place.id).await.unwrap().unwrap();
    assert!(stored.has_amenity(&wifi.id));

    assert!(storage.remove_amenity(&place.id, &wifi.id).await.unwrap());
    assert!(!storage.remove_amenity(&place.id, &wifi.id).await.unwrap());

    let remaining = storage.amenities_of(&place.id).await.unwrap();
    assert_eq!(remaining, vec![oven.clone()]);

    // Unlinking never deletes the amenity itself
    assert!(storage.find::<Amenity>(&wifi.id).await.unwrap().is_some());

    // Saving the place again keeps its links
    let saved = storage.persist(stored).await.unwrap();
    assert!(saved.has_amenity(&oven.id));
    assert_eq!(storage.amenities_of(&place.id).await.unwrap().len(), 1);
}
